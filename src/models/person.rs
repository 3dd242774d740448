//! Typed person schema for PDL enrichment payloads.
//!
//! Every field is optional — the API omits anything it has no data for —
//! and unknown fields are tolerated so schema drift upstream does not break
//! deserialization. These shapes are read-only data transfer objects; the
//! match engine only consumes the accessor surface at the bottom of this
//! file.

use serde::{Deserialize, Serialize};

/// A physical location attached to a company, school, or person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line_2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// City-center geo code in the format "latitude, longitude".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metro: Option<String>,
    /// Cleaned value in the format "locality, region, country".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_address: Option<String>,
}

/// A professional certification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Certification {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
}

/// The school referenced by an [`Education`] entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EducationSchool {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter_url: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub school_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// The school field arrives either as a bare name or a structured object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchoolRef {
    Name(String),
    School(Box<EducationSchool>),
}

/// One education entry on a person record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Education {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degrees: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpa: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub majors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school: Option<SchoolRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// An email address associated with a person record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Email {
    /// The fully parsed email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Date this address was first associated with the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_seen: Option<String>,
    /// Date this address was last associated with the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<String>,
    /// Number of sources backing the association.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_sources: Option<i64>,
    /// Email type, e.g. "professional" or "personal".
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub email_type: Option<String>,
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let address = self.address.as_deref().unwrap_or("");
        let email_type = self.email_type.as_deref().unwrap_or("");
        let first = self.first_seen.as_deref().unwrap_or("");
        let last = self.last_seen.as_deref().unwrap_or("");
        if first.is_empty() && last.is_empty() {
            write!(f, "{address} ({email_type} )")
        } else {
            write!(f, "{address} ({email_type} {first} - {last})")
        }
    }
}

/// Exact-match filter for [`Person::get_emails`].
///
/// `None` fields are wildcards. This is the typed rendition of a free-form
/// attribute/value filter: new filterable fields get a new struct field, not
/// a stringly-typed lookup.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EmailFilter {
    /// Match the parsed address exactly.
    pub address: Option<String>,
    /// Match the email type exactly.
    pub email_type: Option<String>,
}

impl EmailFilter {
    fn matches(&self, email: &Email) -> bool {
        if let Some(want) = &self.address {
            if email.address.as_deref() != Some(want.as_str()) {
                return false;
            }
        }
        if let Some(want) = &self.email_type {
            if email.email_type.as_deref() != Some(want.as_str()) {
                return false;
            }
        }
        true
    }
}

/// A company referenced by a work-experience entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Company {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub founded: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter_url: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub company_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// A job title, cleaned and canonicalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ExperienceTitle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub levels: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_role: Option<String>,
}

/// One work-experience entry on a person record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Experience {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<Company>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_seen: Option<String>,
    /// Whether this is the person's current job.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_primary: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_names: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_sources: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<ExperienceTitle>,
}

/// A person record as returned by the enrichment API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Person {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_year: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certifications: Option<Vec<Certification>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub countries: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<Vec<Education>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emails: Option<Vec<Email>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<Vec<Experience>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook_friends: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook_username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Date when this record first appeared in the dataset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_seen: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_username: Option<String>,
    /// Persistent identifier for the person.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
}

impl Person {
    /// Return a copy of the person's emails.
    ///
    /// Optionally filtered by exact field match, sorted by `last_seen`
    /// descending by default. Records without a `last_seen` date sort as the
    /// earliest possible date.
    pub fn get_emails(
        &self,
        filter: Option<&EmailFilter>,
        sort_by_last_seen: bool,
        reverse: bool,
    ) -> Vec<Email> {
        let Some(emails) = &self.emails else {
            return Vec::new();
        };
        let mut list: Vec<Email> = match filter {
            Some(f) => emails.iter().filter(|e| f.matches(e)).cloned().collect(),
            None => emails.clone(),
        };
        if sort_by_last_seen {
            list.sort_by(|a, b| {
                let ka = a.last_seen.as_deref().unwrap_or("");
                let kb = b.last_seen.as_deref().unwrap_or("");
                ka.cmp(kb)
            });
            if reverse {
                list.reverse();
            }
        }
        list
    }

    /// Return a copy of the person's work experience, sorted by `start_date`
    /// descending by default. Entries without a start date sort as the
    /// earliest possible date.
    pub fn get_experiences(&self, sort_by_start_date: bool, reverse: bool) -> Vec<Experience> {
        let Some(experience) = &self.experience else {
            return Vec::new();
        };
        let mut list = experience.clone();
        if sort_by_start_date {
            list.sort_by(|a, b| {
                let ka = a.start_date.as_deref().unwrap_or("");
                let kb = b.start_date.as_deref().unwrap_or("");
                ka.cmp(kb)
            });
            if reverse {
                list.reverse();
            }
        }
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn email(address: &str, last_seen: Option<&str>, email_type: Option<&str>) -> Email {
        Email {
            address: Some(address.to_string()),
            last_seen: last_seen.map(str::to_string),
            email_type: email_type.map(str::to_string),
            ..Default::default()
        }
    }

    fn person_with_emails(emails: Vec<Email>) -> Person {
        Person {
            emails: Some(emails),
            ..Default::default()
        }
    }

    #[test]
    fn test_get_emails_empty_when_absent() {
        let person = Person::default();
        assert!(person.get_emails(None, true, true).is_empty());
    }

    #[test]
    fn test_get_emails_sorts_most_recent_first() {
        let person = person_with_emails(vec![
            email("old@x.com", Some("2019-03"), None),
            email("new@x.com", Some("2024-11"), None),
            email("mid@x.com", Some("2021-06"), None),
        ]);
        let sorted = person.get_emails(None, true, true);
        let addresses: Vec<_> = sorted.iter().filter_map(|e| e.address.as_deref()).collect();
        assert_eq!(addresses, vec!["new@x.com", "mid@x.com", "old@x.com"]);
    }

    #[test]
    fn test_get_emails_missing_last_seen_sorts_earliest() {
        let person = person_with_emails(vec![
            email("dated@x.com", Some("2020-01"), None),
            email("undated@x.com", None, None),
        ]);
        let sorted = person.get_emails(None, true, true);
        assert_eq!(sorted.last().unwrap().address.as_deref(), Some("undated@x.com"));
        // Ascending order puts the undated record first.
        let ascending = person.get_emails(None, true, false);
        assert_eq!(
            ascending.first().unwrap().address.as_deref(),
            Some("undated@x.com")
        );
    }

    #[test]
    fn test_get_emails_unsorted_preserves_input_order() {
        let person = person_with_emails(vec![
            email("b@x.com", Some("2024-01"), None),
            email("a@x.com", Some("2019-01"), None),
        ]);
        let list = person.get_emails(None, false, true);
        assert_eq!(list[0].address.as_deref(), Some("b@x.com"));
    }

    #[test]
    fn test_get_emails_filter_by_type() {
        let person = person_with_emails(vec![
            email("work@x.com", None, Some("professional")),
            email("home@x.com", None, Some("personal")),
        ]);
        let filter = EmailFilter {
            email_type: Some("personal".into()),
            ..Default::default()
        };
        let list = person.get_emails(Some(&filter), true, true);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].address.as_deref(), Some("home@x.com"));
    }

    #[test]
    fn test_get_emails_filter_by_address() {
        let person = person_with_emails(vec![
            email("one@x.com", None, None),
            email("two@x.com", None, None),
        ]);
        let filter = EmailFilter {
            address: Some("two@x.com".into()),
            ..Default::default()
        };
        let list = person.get_emails(Some(&filter), false, true);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_get_experiences_sorts_by_start_date() {
        let exp = |start: Option<&str>| Experience {
            start_date: start.map(str::to_string),
            ..Default::default()
        };
        let person = Person {
            experience: Some(vec![exp(Some("2015-01")), exp(None), exp(Some("2022-09"))]),
            ..Default::default()
        };
        let sorted = person.get_experiences(true, true);
        assert_eq!(sorted[0].start_date.as_deref(), Some("2022-09"));
        assert!(sorted[2].start_date.is_none());
    }

    #[test]
    fn test_person_deserializes_from_api_shape() {
        let person: Person = serde_json::from_value(json!({
            "full_name": "Jane Doe",
            "emails": [{"address": "jane@x.com", "type": "professional"}],
            "experience": [{
                "company": {"name": "Acme", "type": "private"},
                "start_date": "2020-01",
                "title": {"name": "Engineer"}
            }],
            "education": [{"school": "State University", "degrees": ["BSc"]}],
            "some_future_field": {"ignored": true}
        }))
        .unwrap();
        assert_eq!(person.full_name.as_deref(), Some("Jane Doe"));
        let emails = person.emails.as_ref().unwrap();
        assert_eq!(emails[0].email_type.as_deref(), Some("professional"));
        let school = person.education.as_ref().unwrap()[0].school.as_ref().unwrap();
        assert_eq!(school, &SchoolRef::Name("State University".into()));
    }

    #[test]
    fn test_person_serde_roundtrip() {
        let person = person_with_emails(vec![email("a@x.com", Some("2023-01"), None)]);
        let encoded = serde_json::to_value(&person).unwrap();
        let decoded: Person = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded, person);
    }

    #[test]
    fn test_email_display_includes_date_range() {
        let e = Email {
            address: Some("jane@x.com".into()),
            email_type: Some("professional".into()),
            first_seen: Some("2019-01".into()),
            last_seen: Some("2024-01".into()),
            ..Default::default()
        };
        let s = e.to_string();
        assert!(s.contains("jane@x.com"), "{s}");
        assert!(s.contains("2019-01 - 2024-01"), "{s}");
    }
}
