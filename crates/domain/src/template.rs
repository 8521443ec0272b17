use crate::{certification::NewCertification, date::add_years};
use chrono::NaiveDate;
use itertools::Itertools;
use serde::Serialize;

/// A well known certification which can be used to prefill a new `CertificationRecord`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificationTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub issuing_organization: &'static str,
    pub category: &'static str,
    pub validity_period_years: i32,
    pub renewal_url: Option<&'static str>,
    pub ceu_url: Option<&'static str>,
    pub ceu_required: i64,
    pub description: &'static str,
    pub is_popular: bool,
}

const TEMPLATES: &[CertificationTemplate] = &[
    CertificationTemplate {
        id: "pmp",
        name: "Project Management Professional (PMP)",
        issuing_organization: "Project Management Institute (PMI)",
        category: "Project Management",
        validity_period_years: 3,
        renewal_url: Some("https://www.pmi.org/certifications/maintain/renewal"),
        ceu_url: Some("https://www.pmi.org/learning/education/professional-development-units"),
        ceu_required: 60,
        description: "Industry-recognized project management certification",
        is_popular: true,
    },
    CertificationTemplate {
        id: "capm",
        name: "Certified Associate in Project Management (CAPM)",
        issuing_organization: "Project Management Institute (PMI)",
        category: "Project Management",
        validity_period_years: 3,
        renewal_url: Some("https://www.pmi.org/certifications/maintain/renewal"),
        ceu_url: Some("https://www.pmi.org/learning/education/professional-development-units"),
        ceu_required: 15,
        description: "Entry-level project management certification",
        is_popular: false,
    },
    CertificationTemplate {
        id: "cissp",
        name: "Certified Information Systems Security Professional (CISSP)",
        issuing_organization: "ISC2",
        category: "Security",
        validity_period_years: 3,
        renewal_url: Some("https://www.isc2.org/Certifications/CISSP/Continuing-Professional-Education"),
        ceu_url: Some("https://www.isc2.org/Certifications/CISSP/Continuing-Professional-Education"),
        ceu_required: 120,
        description: "Advanced-level information security certification",
        is_popular: true,
    },
    CertificationTemplate {
        id: "comptia-security",
        name: "CompTIA Security+",
        issuing_organization: "CompTIA",
        category: "Security",
        validity_period_years: 3,
        renewal_url: Some("https://www.comptia.org/certifications/security"),
        ceu_url: Some("https://www.comptia.org/continuing-education"),
        ceu_required: 50,
        description: "Cybersecurity fundamentals certification",
        is_popular: true,
    },
    CertificationTemplate {
        id: "comptia-a",
        name: "CompTIA A+",
        issuing_organization: "CompTIA",
        category: "IT",
        validity_period_years: 3,
        renewal_url: Some("https://www.comptia.org/certifications/a"),
        ceu_url: Some("https://www.comptia.org/continuing-education"),
        ceu_required: 20,
        description: "Entry-level certification for technical support roles",
        is_popular: false,
    },
    CertificationTemplate {
        id: "comptia-network",
        name: "CompTIA Network+",
        issuing_organization: "CompTIA",
        category: "IT",
        validity_period_years: 3,
        renewal_url: Some("https://www.comptia.org/certifications/network"),
        ceu_url: Some("https://www.comptia.org/continuing-education"),
        ceu_required: 30,
        description: "Networking fundamentals and troubleshooting certification",
        is_popular: false,
    },
    CertificationTemplate {
        id: "aws-saa",
        name: "AWS Solutions Architect Associate",
        issuing_organization: "Amazon Web Services",
        category: "Cloud",
        validity_period_years: 3,
        renewal_url: Some("https://aws.amazon.com/certification/recertification/"),
        ceu_url: Some("https://aws.amazon.com/training/"),
        ceu_required: 0,
        description: "Cloud architecture and AWS services certification",
        is_popular: true,
    },
    CertificationTemplate {
        id: "azure-administrator",
        name: "Microsoft Certified: Azure Administrator Associate",
        issuing_organization: "Microsoft",
        category: "Cloud",
        validity_period_years: 1,
        renewal_url: Some("https://learn.microsoft.com/credentials/certifications/renew-your-microsoft-certification"),
        ceu_url: None,
        ceu_required: 0,
        description: "Implementing and managing Azure workloads",
        is_popular: false,
    },
    CertificationTemplate {
        id: "csm",
        name: "Certified ScrumMaster (CSM)",
        issuing_organization: "Scrum Alliance",
        category: "Agile",
        validity_period_years: 2,
        renewal_url: Some("https://www.scrumalliance.org/renew"),
        ceu_url: Some("https://www.scrumalliance.org/get-certified/scrum-education-units"),
        ceu_required: 20,
        description: "Scrum framework and servant leadership certification",
        is_popular: false,
    },
];

impl CertificationTemplate {
    pub fn expiration_date(&self, issue_date: NaiveDate) -> NaiveDate {
        add_years(issue_date, self.validity_period_years)
    }

    /// Prefills a `NewCertification` issued at `issue_date`
    pub fn new_certification(&self, issue_date: NaiveDate) -> NewCertification {
        NewCertification {
            name: self.name.into(),
            issuing_organization: self.issuing_organization.into(),
            issue_date: Some(issue_date),
            expiration_date: Some(self.expiration_date(issue_date)),
            renewal_url: self.renewal_url.map(String::from),
            ceu_url: self.ceu_url.map(String::from),
            ceu_required: self.ceu_required,
            ..Default::default()
        }
    }
}

/// All templates, popular ones first and then by name
pub fn all_templates() -> Vec<&'static CertificationTemplate> {
    TEMPLATES
        .iter()
        .sorted_by(|a, b| b.is_popular.cmp(&a.is_popular).then(a.name.cmp(b.name)))
        .collect()
}

pub fn templates_by_category(category: &str) -> Vec<&'static CertificationTemplate> {
    all_templates()
        .into_iter()
        .filter(|t| t.category.eq_ignore_ascii_case(category))
        .collect()
}

pub fn popular_templates() -> Vec<&'static CertificationTemplate> {
    all_templates().into_iter().filter(|t| t.is_popular).collect()
}

pub fn template_categories() -> Vec<&'static str> {
    TEMPLATES.iter().map(|t| t.category).unique().sorted().collect()
}

pub fn find_template(id: &str) -> Option<&'static CertificationTemplate> {
    TEMPLATES.iter().find(|t| t.id == id)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::CertificationRecord;

    #[test]
    fn popular_templates_are_listed_first() {
        let templates = all_templates();
        let first_unpopular = templates.iter().position(|t| !t.is_popular).unwrap();
        assert!(templates[..first_unpopular].iter().all(|t| t.is_popular));
        assert!(templates[first_unpopular..].iter().all(|t| !t.is_popular));
        assert_eq!(templates.len(), TEMPLATES.len());
    }

    #[test]
    fn lists_distinct_sorted_categories() {
        assert_eq!(
            template_categories(),
            vec!["Agile", "Cloud", "IT", "Project Management", "Security"]
        );
    }

    #[test]
    fn filters_by_category() {
        let security = templates_by_category("security");
        assert_eq!(security.len(), 2);
        assert!(templates_by_category("Gardening").is_empty());
    }

    #[test]
    fn creates_valid_certification_from_template() {
        let template = find_template("pmp").unwrap();
        let issued = NaiveDate::from_ymd(2024, 2, 29);
        let record = CertificationRecord::new(template.new_certification(issued)).unwrap();
        assert_eq!(record.expiration_date, Some(NaiveDate::from_ymd(2027, 2, 28)));
        assert_eq!(record.ceu_required, 60);
        assert!(record.renewal_url.is_some());
    }

    #[test]
    fn every_template_is_a_valid_certification() {
        let issued = NaiveDate::from_ymd(2024, 1, 1);
        for template in all_templates() {
            assert!(CertificationRecord::new(template.new_certification(issued)).is_ok());
        }
        assert!(find_template("unknown").is_none());
    }
}
