//! Configuration for client anchors.
//!
//! Every field is range checked except the anchor type, whose accepted values
//! are governed by [`AnchorTypeValidation`].
//!
//! # Examples
//!
//! ```rust
//! use litchi_anchor::ole::xls::{AnchorOptions, AnchorTypeValidation};
//!
//! // Permissive by default
//! let options = AnchorOptions::default();
//! assert_eq!(options.anchor_type_validation, AnchorTypeValidation::Permissive);
//!
//! // Or customize
//! let options = AnchorOptions::new().with_anchor_type_validation(AnchorTypeValidation::Strict);
//! ```

use serde::{Deserialize, Serialize};

use crate::common::{Error, Result};

/// How anchor type codes outside {0, 2, 3} are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorTypeValidation {
    /// Store any 16-bit code; unknown codes are logged.
    #[default]
    Permissive,
    /// Reject unknown codes with `Error::InvalidAnchorType`.
    Strict,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorOptions {
    /// Validation applied by `ClientAnchor::set_anchor_type`
    pub anchor_type_validation: AnchorTypeValidation,
}

impl AnchorOptions {
    /// Create a new `AnchorOptions` with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how unknown anchor type codes are treated.
    #[inline]
    pub fn with_anchor_type_validation(mut self, validation: AnchorTypeValidation) -> Self {
        self.anchor_type_validation = validation;
        self
    }

    #[inline]
    pub fn is_strict(&self) -> bool {
        self.anchor_type_validation == AnchorTypeValidation::Strict
    }

    /// Load options from YAML. Missing keys keep their defaults.
    ///
    /// ```rust
    /// use litchi_anchor::ole::xls::AnchorOptions;
    ///
    /// let options = AnchorOptions::from_yaml("anchor_type_validation: strict\n").unwrap();
    /// assert!(options.is_strict());
    /// ```
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_saphyr::from_str(yaml)
            .map_err(|e| Error::Config(format!("Failed to parse anchor options: {}", e)))
    }

    /// Serialize options to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_saphyr::to_string(self)
            .map_err(|e| Error::Config(format!("Failed to serialize anchor options: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_permissive() {
        let options = AnchorOptions::new();
        assert!(!options.is_strict());
    }

    #[test]
    fn test_yaml_round_trip() {
        let options = AnchorOptions::new().with_anchor_type_validation(AnchorTypeValidation::Strict);
        let yaml = options.to_yaml().unwrap();
        assert!(yaml.contains("strict"));
        assert_eq!(AnchorOptions::from_yaml(&yaml).unwrap(), options);
    }

    #[test]
    fn test_yaml_missing_key_uses_default() {
        let options = AnchorOptions::from_yaml("{}").unwrap();
        assert_eq!(options, AnchorOptions::default());
    }

    #[test]
    fn test_yaml_unknown_mode() {
        let err = AnchorOptions::from_yaml("anchor_type_validation: lenient\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
