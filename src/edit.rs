// Tag edits given on the command line (`--tag`, `--add`, `--remove`)

use crate::error::TagEditError;
use crate::tag_map::TagMap;

/// A single edit to a tag map
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagEdit {
    /// Replace all values of a tag
    Set { key: String, value: String },
    /// Append a value
    Add { key: String, value: String },
    /// Remove a whole tag, or just one of its values
    Remove { key: String, value: Option<String> },
}

fn split_pair(s: &str) -> Result<(&str, &str), TagEditError> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| TagEditError::MissingValue(s.to_string()))?;
    if key.is_empty() {
        return Err(TagEditError::EmptyKey(s.to_string()));
    }
    Ok((key, value))
}

impl TagEdit {
    /// Parse `tag=value` for `--tag`; the value must not be empty
    pub fn parse_set(s: &str) -> Result<Self, TagEditError> {
        let (key, value) = split_pair(s)?;
        if value.is_empty() {
            return Err(TagEditError::MissingValue(s.to_string()));
        }
        Ok(TagEdit::Set {
            key: key.to_string(),
            value: value.to_string(),
        })
    }

    /// Parse `tag=value` for `--add`
    pub fn parse_add(s: &str) -> Result<Self, TagEditError> {
        let (key, value) = split_pair(s)?;
        Ok(TagEdit::Add {
            key: key.to_string(),
            value: value.to_string(),
        })
    }

    /// Parse `tag` or `tag=value` for `--remove`
    pub fn parse_remove(s: &str) -> Result<Self, TagEditError> {
        let (key, value) = match s.split_once('=') {
            Some((key, value)) => (key, Some(value.to_string()).filter(|v| !v.is_empty())),
            None => (s, None),
        };
        if key.is_empty() {
            return Err(TagEditError::EmptyKey(s.to_string()));
        }
        Ok(TagEdit::Remove {
            key: key.to_string(),
            value,
        })
    }

    pub fn key(&self) -> &str {
        match self {
            TagEdit::Set { key, .. } | TagEdit::Add { key, .. } | TagEdit::Remove { key, .. } => key,
        }
    }

    /// Apply to `tags`; returns whether anything changed
    pub fn apply(&self, tags: &mut TagMap) -> bool {
        match self {
            TagEdit::Set { key, value } => {
                let unchanged = tags.get(key) == Some(std::slice::from_ref(value));
                tags.set(key, [value.as_str()]);
                !unchanged
            }
            TagEdit::Add { key, value } => {
                tags.append(key, value.as_str());
                true
            }
            TagEdit::Remove { key, value: None } => tags.remove(key).is_some(),
            TagEdit::Remove { key, value: Some(value) } => tags.remove_value(key, value),
        }
    }
}
