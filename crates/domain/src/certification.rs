use crate::{
    shared::entity::{Entity, ID},
    status::{classify, CertificationStatus},
};
use chrono::NaiveDate;
use chrono_tz::Tz;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Used when a `CertificationRecord` is created without any reminder offsets
pub const DEFAULT_REMINDER_OFFSETS: [u32; 4] = [90, 60, 30, 7];

/// Reminders can be at most a hundred years ahead of the expiration
pub const MAX_REMINDER_OFFSET_DAYS: i64 = 36_500;

/// Upper bound for both required and earned CEUs
pub const MAX_CEU: i64 = 100_000;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidRecord {
    #[error("Certification name must not be empty")]
    EmptyName,
    #[error("Issuing organization must not be empty")]
    EmptyIssuingOrganization,
    #[error("Reminder offset: {0} is negative")]
    NegativeReminderOffset(i64),
    #[error("Reminder offset: {0} is larger than the maximum of {max} days", max = MAX_REMINDER_OFFSET_DAYS)]
    ReminderOffsetTooLarge(i64),
    #[error("Reminder offset: `{0}` is not a number")]
    MalformedReminderOffset(String),
    #[error("CEU value: {0} is negative")]
    NegativeCeu(i64),
    #[error("CEU value: {0} is larger than the maximum of {max}", max = MAX_CEU)]
    CeuTooLarge(i64),
    #[error("Expiration date: {expiration} is before issue date: {issue}")]
    ExpirationBeforeIssue {
        issue: NaiveDate,
        expiration: NaiveDate,
    },
    #[error("Url: `{0}` is not a valid http or https url")]
    InvalidUrl(String),
}

/// The days before expiration at which reminders should fire.
/// Values are unique and the order they were given in is irrelevant.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReminderOffsets(BTreeSet<u32>);

impl ReminderOffsets {
    pub fn new(offsets: &[i64]) -> Result<Self, InvalidRecord> {
        let mut set = BTreeSet::new();
        for offset in offsets {
            if *offset < 0 {
                return Err(InvalidRecord::NegativeReminderOffset(*offset));
            }
            if *offset > MAX_REMINDER_OFFSET_DAYS {
                return Err(InvalidRecord::ReminderOffsetTooLarge(*offset));
            }
            set.insert(*offset as u32);
        }
        Ok(Self(set))
    }

    /// Parses a comma separated list like `"30, 7, 1"`. Empty entries are
    /// ignored, anything else that is not a number is rejected.
    pub fn parse(offsets: &str) -> Result<Self, InvalidRecord> {
        let offsets = offsets
            .split(',')
            .map(str::trim)
            .filter(|offset| !offset.is_empty())
            .map(|offset| {
                offset
                    .parse::<i64>()
                    .map_err(|_| InvalidRecord::MalformedReminderOffset(offset.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(&offsets)
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }

    /// Offsets from the furthest away from expiration to the closest
    pub fn descending(&self) -> Vec<u32> {
        self.0.iter().rev().copied().collect()
    }

    pub fn contains(&self, offset: u32) -> bool {
        self.0.contains(&offset)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for ReminderOffsets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.descending().iter().join(","))
    }
}

impl From<[u32; 4]> for ReminderOffsets {
    fn from(offsets: [u32; 4]) -> Self {
        Self(offsets.iter().copied().collect())
    }
}

/// A professional certification that the owner wants to keep track of
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificationRecord {
    pub id: ID,
    pub name: String,
    pub issuing_organization: String,
    pub certification_number: Option<String>,
    pub issue_date: Option<NaiveDate>,
    /// `None` means that the certification never expires
    pub expiration_date: Option<NaiveDate>,
    pub renewal_url: Option<String>,
    pub ceu_url: Option<String>,
    pub reminder_offsets: ReminderOffsets,
    pub ceu_required: u32,
    pub ceu_earned: u32,
    /// Inactive records are kept, but are not listed and never get reminders
    pub is_active: bool,
    /// Set by the store
    pub created: i64,
    /// Set by the store
    pub updated: i64,
}

/// Input used to construct a valid `CertificationRecord`
#[derive(Debug, Clone, Default)]
pub struct NewCertification {
    pub name: String,
    pub issuing_organization: String,
    pub certification_number: Option<String>,
    pub issue_date: Option<NaiveDate>,
    pub expiration_date: Option<NaiveDate>,
    pub renewal_url: Option<String>,
    pub ceu_url: Option<String>,
    /// Falls back to the default offsets when `None`
    pub reminder_offsets: Option<Vec<i64>>,
    pub ceu_required: i64,
    pub ceu_earned: i64,
}

/// Changes to apply to an existing `CertificationRecord`.
/// Fields that are `None` are left as they are.
#[derive(Debug, Clone, Default)]
pub struct CertificationChanges {
    pub name: Option<String>,
    pub issuing_organization: Option<String>,
    pub certification_number: Option<Option<String>>,
    pub issue_date: Option<Option<NaiveDate>>,
    pub expiration_date: Option<Option<NaiveDate>>,
    pub renewal_url: Option<Option<String>>,
    pub ceu_url: Option<Option<String>>,
    pub reminder_offsets: Option<Vec<i64>>,
    pub ceu_required: Option<i64>,
    pub ceu_earned: Option<i64>,
}

fn validate_display_string(value: &str, err: InvalidRecord) -> Result<String, InvalidRecord> {
    let value = value.trim();
    if value.is_empty() {
        Err(err)
    } else {
        Ok(value.to_string())
    }
}

fn validate_url(url: Option<String>) -> Result<Option<String>, InvalidRecord> {
    let url = match url.map(|url| url.trim().to_string()) {
        Some(url) if !url.is_empty() => url,
        _ => return Ok(None),
    };
    match url::Url::parse(&url) {
        Ok(parsed_url) if ["https", "http"].contains(&parsed_url.scheme()) => Ok(Some(url)),
        _ => Err(InvalidRecord::InvalidUrl(url)),
    }
}

fn validate_ceu(value: i64) -> Result<u32, InvalidRecord> {
    if value < 0 {
        Err(InvalidRecord::NegativeCeu(value))
    } else if value > MAX_CEU {
        Err(InvalidRecord::CeuTooLarge(value))
    } else {
        Ok(value as u32)
    }
}

fn validate_dates(
    issue_date: Option<NaiveDate>,
    expiration_date: Option<NaiveDate>,
) -> Result<(), InvalidRecord> {
    match (issue_date, expiration_date) {
        (Some(issue), Some(expiration)) if expiration < issue => {
            Err(InvalidRecord::ExpirationBeforeIssue { issue, expiration })
        }
        _ => Ok(()),
    }
}

impl CertificationRecord {
    pub fn new(input: NewCertification) -> Result<Self, InvalidRecord> {
        let name = validate_display_string(&input.name, InvalidRecord::EmptyName)?;
        let issuing_organization = validate_display_string(
            &input.issuing_organization,
            InvalidRecord::EmptyIssuingOrganization,
        )?;
        validate_dates(input.issue_date, input.expiration_date)?;
        let reminder_offsets = match input.reminder_offsets {
            Some(offsets) => ReminderOffsets::new(&offsets)?,
            None => ReminderOffsets::from(DEFAULT_REMINDER_OFFSETS),
        };

        Ok(Self {
            id: Default::default(),
            name,
            issuing_organization,
            certification_number: input
                .certification_number
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            issue_date: input.issue_date,
            expiration_date: input.expiration_date,
            renewal_url: validate_url(input.renewal_url)?,
            ceu_url: validate_url(input.ceu_url)?,
            reminder_offsets,
            ceu_required: validate_ceu(input.ceu_required)?,
            ceu_earned: validate_ceu(input.ceu_earned)?,
            is_active: true,
            created: 0,
            updated: 0,
        })
    }

    /// Applies the given changes, leaving `self` untouched if any of them are invalid.
    /// Returns whether anything affecting the reminders of this record changed.
    pub fn apply_changes(&mut self, changes: CertificationChanges) -> Result<bool, InvalidRecord> {
        let mut updated = self.clone();

        if let Some(name) = changes.name {
            updated.name = validate_display_string(&name, InvalidRecord::EmptyName)?;
        }
        if let Some(org) = changes.issuing_organization {
            updated.issuing_organization =
                validate_display_string(&org, InvalidRecord::EmptyIssuingOrganization)?;
        }
        if let Some(number) = changes.certification_number {
            updated.certification_number = number;
        }
        if let Some(issue_date) = changes.issue_date {
            updated.issue_date = issue_date;
        }
        if let Some(expiration_date) = changes.expiration_date {
            updated.expiration_date = expiration_date;
        }
        validate_dates(updated.issue_date, updated.expiration_date)?;
        if let Some(url) = changes.renewal_url {
            updated.renewal_url = validate_url(url)?;
        }
        if let Some(url) = changes.ceu_url {
            updated.ceu_url = validate_url(url)?;
        }
        if let Some(offsets) = changes.reminder_offsets {
            updated.reminder_offsets = ReminderOffsets::new(&offsets)?;
        }
        if let Some(required) = changes.ceu_required {
            updated.ceu_required = validate_ceu(required)?;
        }
        if let Some(earned) = changes.ceu_earned {
            updated.ceu_earned = validate_ceu(earned)?;
        }

        let reminders_changed = updated.expiration_date != self.expiration_date
            || updated.reminder_offsets != self.reminder_offsets;
        *self = updated;
        Ok(reminders_changed)
    }

    /// Fraction of the required CEUs that have been earned, capped at 1.0
    pub fn ceu_progress(&self) -> f64 {
        if self.ceu_required == 0 {
            return 1.0;
        }
        f64::min(self.ceu_earned as f64 / self.ceu_required as f64, 1.0)
    }

    pub fn ceu_remaining(&self) -> u32 {
        self.ceu_required.saturating_sub(self.ceu_earned)
    }

    /// Adds newly earned CEUs. The record is left untouched if the amount
    /// is negative or the total would exceed `MAX_CEU`.
    pub fn add_ceu(&mut self, earned: i64) -> Result<(), InvalidRecord> {
        let earned = validate_ceu(earned)?;
        self.ceu_earned = validate_ceu(self.ceu_earned as i64 + earned as i64)?;
        Ok(())
    }

    /// The status of this certification at `now`, counting days on the calendar of `tz`
    pub fn status(&self, now: i64, tz: &Tz) -> CertificationStatus {
        classify(now, self.expiration_date, tz)
    }
}

impl Entity for CertificationRecord {
    fn id(&self) -> &ID {
        &self.id
    }
}
