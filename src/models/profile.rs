//! Profile model and the allow-listed partial update.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Labeled external link on a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct ProfileLink {
    pub label: String,
    pub url: String,
}

/// Student profile, 1:1 with a User, keyed by the same subject id.
///
/// Created lazily on first profile access or account sync. Account sync only
/// ever backfills `name`/`contact_email` when they are empty; everything else
/// is owned by the profile update operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub subject_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub contact_email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub links: Vec<ProfileLink>,
}

impl Profile {
    /// A blank profile for the given subject.
    pub fn empty(subject_id: impl Into<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
            student_id: None,
            name: String::new(),
            department: String::new(),
            year: String::new(),
            skills: Vec::new(),
            interests: Vec::new(),
            bio: String::new(),
            contact_email: String::new(),
            phone: String::new(),
            links: Vec::new(),
        }
    }

    /// Apply a partial update. Only fields present in the request are
    /// touched; absent fields keep their current value.
    pub fn apply_update(&mut self, update: ProfileUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(student_id) = update.student_id {
            self.student_id = Some(student_id).filter(|s| !s.is_empty());
        }
        if let Some(department) = update.department {
            self.department = department;
        }
        if let Some(year) = update.year {
            self.year = year;
        }
        if let Some(skills) = update.skills {
            self.skills = normalize_string_list(skills);
        }
        if let Some(interests) = update.interests {
            self.interests = normalize_string_list(interests);
        }
        if let Some(bio) = update.bio {
            self.bio = bio;
        }
        if let Some(contact_email) = update.contact_email {
            self.contact_email = contact_email.to_lowercase();
        }
        if let Some(phone) = update.phone {
            self.phone = phone;
        }
        if let Some(links) = update.links {
            self.links = normalize_links(links);
        }
    }
}

/// List fields arrive either pre-split or as one comma-separated string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StringListInput {
    List(Vec<String>),
    Text(String),
}

/// Allow-listed partial profile update. Unknown fields are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub student_id: Option<String>,
    pub department: Option<String>,
    pub year: Option<String>,
    pub skills: Option<StringListInput>,
    pub interests: Option<StringListInput>,
    pub bio: Option<String>,
    pub contact_email: Option<String>,
    pub phone: Option<String>,
    pub links: Option<Vec<ProfileLinkInput>>,
}

/// Raw link entry; dropped unless both label and url survive trimming.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileLinkInput {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

fn normalize_string_list(input: StringListInput) -> Vec<String> {
    let raw = match input {
        StringListInput::List(items) => items,
        StringListInput::Text(text) => text.split(',').map(str::to_string).collect(),
    };

    raw.into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn normalize_links(links: Vec<ProfileLinkInput>) -> Vec<ProfileLink> {
    links
        .into_iter()
        .filter_map(|link| {
            let label = link.label.unwrap_or_default().trim().to_string();
            let url = link.url.unwrap_or_default().trim().to_string();
            if label.is_empty() || url.is_empty() {
                None
            } else {
                Some(ProfileLink { label, url })
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_touches_only_present_fields() {
        let mut profile = Profile::empty("uid-1");
        profile.skills = vec!["Rust".to_string()];
        profile.department = "CS".to_string();

        profile.apply_update(ProfileUpdate {
            department: Some("Design".to_string()),
            ..Default::default()
        });

        assert_eq!(profile.department, "Design");
        assert_eq!(profile.skills, vec!["Rust"]);
    }

    #[test]
    fn list_fields_accept_comma_strings() {
        let mut profile = Profile::empty("uid-1");
        profile.apply_update(ProfileUpdate {
            skills: Some(StringListInput::Text("React, Python".to_string())),
            interests: Some(StringListInput::List(vec![
                " AI ".to_string(),
                String::new(),
            ])),
            ..Default::default()
        });

        assert_eq!(profile.skills, vec!["React", "Python"]);
        assert_eq!(profile.interests, vec!["AI"]);
    }

    #[test]
    fn contact_email_is_lowercased() {
        let mut profile = Profile::empty("uid-1");
        profile.apply_update(ProfileUpdate {
            contact_email: Some("Casey@EventsHub.EDU".to_string()),
            ..Default::default()
        });
        assert_eq!(profile.contact_email, "casey@eventshub.edu");
    }

    #[test]
    fn incomplete_links_are_dropped() {
        let mut profile = Profile::empty("uid-1");
        profile.apply_update(ProfileUpdate {
            links: Some(vec![
                ProfileLinkInput {
                    label: Some("GitHub".to_string()),
                    url: Some(" https://github.com/casey ".to_string()),
                },
                ProfileLinkInput {
                    label: Some("  ".to_string()),
                    url: Some("https://nowhere".to_string()),
                },
                ProfileLinkInput {
                    label: Some("Portfolio".to_string()),
                    url: None,
                },
            ]),
            ..Default::default()
        });

        assert_eq!(
            profile.links,
            vec![ProfileLink {
                label: "GitHub".to_string(),
                url: "https://github.com/casey".to_string(),
            }]
        );
    }
}
