//! Resource payloads exchanged with the projects service.
//!
//! A [`Project`] owns zero or more [`Meeting`]s. Identifiers are issued by
//! the service and appear as an `id` attribute on the root element of a
//! response body; request payloads never carry one.

use std::fmt;
use std::str::FromStr;

use quick_xml::escape::escape;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Root element name of a project document.
pub const PROJECT_ROOT: &str = "project";
/// Root element name of a meeting document.
pub const MEETING_ROOT: &str = "meeting";
/// Container element listing a project's meetings.
pub const MEETINGS_CONTAINER: &str = "meetings";

/// A server-assigned resource identifier.
///
/// Only non-negative decimal integers are identifiers; `-1` and `asdf`
/// never resolve to a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(u64);

impl ResourceId {
    /// Creates an identifier from its numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl FromStr for ResourceId {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::InvalidIdentifier(s.to_string()));
        }
        s.parse::<u64>()
            .map(Self)
            .map_err(|_| DomainError::InvalidIdentifier(s.to_string()))
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Returns an error unless `value` has non-whitespace content.
fn require_text(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        Err(DomainError::InvalidBody(format!("'{field}' must not be empty")))
    } else {
        Ok(())
    }
}

/// Parses a meeting year: a present, non-negative decimal integer.
///
/// # Errors
///
/// Returns `InvalidBody` for empty, negative or non-numeric input.
pub fn parse_year(raw: &str) -> DomainResult<u32> {
    let trimmed = raw.trim();
    require_text("year", trimmed)?;
    if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DomainError::InvalidBody(format!(
            "'year' must be a non-negative integer, got '{trimmed}'"
        )));
    }
    trimmed
        .parse()
        .map_err(|_| DomainError::InvalidBody(format!("'year' out of range: '{trimmed}'")))
}

/// A meeting nested under a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meeting {
    /// Server-assigned identifier, unique within the parent project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ResourceId>,
    /// Meeting name.
    pub name: String,
    /// Meeting year.
    pub year: u32,
}

impl Meeting {
    /// Creates a meeting payload without an identifier.
    #[must_use]
    pub fn new(name: impl Into<String>, year: u32) -> Self {
        Self {
            id: None,
            name: name.into(),
            year,
        }
    }

    /// Sets the identifier (builder pattern).
    #[must_use]
    pub const fn with_id(mut self, id: ResourceId) -> Self {
        self.id = Some(id);
        self
    }

    /// Checks the required fields.
    ///
    /// # Errors
    ///
    /// Returns `InvalidBody` when the name is empty or whitespace-only.
    pub fn validate(&self) -> DomainResult<()> {
        require_text("name", &self.name)
    }

    /// Renders the meeting as an XML document.
    #[must_use]
    pub fn to_xml(&self) -> String {
        let id_attr = self
            .id
            .map(|id| format!(" id=\"{id}\""))
            .unwrap_or_default();
        format!(
            "<{MEETING_ROOT}{id_attr}><name>{}</name><year>{}</year></{MEETING_ROOT}>",
            escape(self.name.as_str()),
            self.year
        )
    }
}

/// A project with its owned meetings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Server-assigned identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ResourceId>,
    /// Project name.
    pub name: String,
    /// Project description.
    pub description: String,
    /// Meetings owned by the project.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub meetings: Vec<Meeting>,
}

impl Project {
    /// Creates a project payload without an identifier or meetings.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: description.into(),
            meetings: Vec::new(),
        }
    }

    /// Sets the identifier (builder pattern).
    #[must_use]
    pub const fn with_id(mut self, id: ResourceId) -> Self {
        self.id = Some(id);
        self
    }

    /// Checks the required fields.
    ///
    /// # Errors
    ///
    /// Returns `InvalidBody` when the name or description is empty or
    /// whitespace-only.
    pub fn validate(&self) -> DomainResult<()> {
        require_text("name", &self.name)?;
        require_text("description", &self.description)
    }

    /// Renders the project as an XML document.
    ///
    /// The `<meetings>` container is only emitted when meetings exist.
    #[must_use]
    pub fn to_xml(&self) -> String {
        let id_attr = self
            .id
            .map(|id| format!(" id=\"{id}\""))
            .unwrap_or_default();
        let meetings = if self.meetings.is_empty() {
            String::new()
        } else {
            let inner: String = self.meetings.iter().map(Meeting::to_xml).collect();
            format!("<{MEETINGS_CONTAINER}>{inner}</{MEETINGS_CONTAINER}>")
        };
        format!(
            "<{PROJECT_ROOT}{id_attr}><name>{}</name><description>{}</description>{meetings}</{PROJECT_ROOT}>",
            escape(self.name.as_str()),
            escape(self.description.as_str()),
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_resource_id_accepts_digits_only() {
        assert_eq!("42".parse::<ResourceId>().unwrap(), ResourceId::new(42));
        assert!("-1".parse::<ResourceId>().is_err());
        assert!("asdf".parse::<ResourceId>().is_err());
        assert!("".parse::<ResourceId>().is_err());
        assert!("+3".parse::<ResourceId>().is_err());
        assert!("3a".parse::<ResourceId>().is_err());
    }

    #[test]
    fn test_project_xml() {
        let project = Project::new("solum", "Project representing solum");
        assert_eq!(
            project.to_xml(),
            "<project><name>solum</name><description>Project representing solum</description></project>"
        );
    }

    #[test]
    fn test_project_xml_with_id_and_meetings() {
        let mut project = Project::new("solum", "d").with_id(ResourceId::new(7));
        project
            .meetings
            .push(Meeting::new("m1", 2014).with_id(ResourceId::new(1)));
        assert_eq!(
            project.to_xml(),
            "<project id=\"7\"><name>solum</name><description>d</description>\
             <meetings><meeting id=\"1\"><name>m1</name><year>2014</year></meeting></meetings></project>"
        );
    }

    #[test]
    fn test_xml_text_is_escaped() {
        let project = Project::new("a<b", "x & y");
        let xml = project.to_xml();
        assert!(xml.contains("<name>a&lt;b</name>"));
        assert!(xml.contains("<description>x &amp; y</description>"));
    }

    #[test]
    fn test_project_validation_rejects_blank_fields() {
        assert!(Project::new("solum", "desc").validate().is_ok());
        assert!(Project::new("", "desc").validate().is_err());
        assert!(Project::new("solum", "   ").validate().is_err());
        assert!(Meeting::new(" \t", 2014).validate().is_err());
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year("2014").unwrap(), 2014);
        assert_eq!(parse_year(" 0 ").unwrap(), 0);
        assert!(parse_year("-1").is_err());
        assert!(parse_year("abc").is_err());
        assert!(parse_year("").is_err());
        assert!(parse_year("   ").is_err());
    }
}
