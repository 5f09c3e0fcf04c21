use crate::error::{TraversalError, VisitError};
use crate::field::Record;
use crate::leaf::Slot;
use crate::visit::{Visitor, visit};
use std::ffi::OsString;

/// Visitor that reads each leaf's environment key and writes the parsed value
///
/// Unset keys leave the field alone, so whatever the record held before
/// loading acts as the default.
pub struct Loader<F> {
    lookup: F,
}

impl Loader<fn(&str) -> Option<OsString>> {
    /// Read from the process environment
    pub fn from_env() -> Self {
        Self { lookup: env_lookup }
    }
}

fn env_lookup(key: &str) -> Option<OsString> {
    std::env::var_os(key)
}

impl<F> Loader<F>
where
    F: Fn(&str) -> Option<OsString>,
{
    /// Read from `lookup` instead of the process environment
    pub fn new(lookup: F) -> Self {
        Self { lookup }
    }
}

impl<F> Visitor for Loader<F>
where
    F: Fn(&str) -> Option<OsString>,
{
    fn visit(&mut self, key: &str, slot: &mut dyn Slot) -> Result<(), VisitError> {
        let Some(raw) = (self.lookup)(key) else {
            return Ok(());
        };
        let raw = raw.into_string().map_err(|raw| {
            tracing::debug!(key, "rejected non-unicode value");
            VisitError::with_value("must be valid unicode", raw.to_string_lossy())
        })?;

        match slot.assign(&raw) {
            Ok(()) => {
                tracing::debug!(key, kind = %slot.kind(), "loaded");
                Ok(())
            }
            Err(reason) => {
                tracing::debug!(key, expected = %slot.kind().expected(), "rejected value");
                Err(VisitError::with_value(reason, raw))
            }
        }
    }
}

/// Load environment variables named `PREFIX_TAG...` into `record`
///
/// Every invalid variable is reported in the returned error, not just the
/// first. Fields whose variables are valid are written even when others fail.
///
/// # Panics
/// If the record's schema is invalid. See [`crate::SchemaError`].
pub fn load<R: Record>(record: &mut R, prefix: &str) -> Result<(), TraversalError> {
    visit(record, prefix, &mut Loader::from_env())
}

/// Like [`load`], reading values from `lookup` instead of the process environment
pub fn load_with<R, F>(record: &mut R, prefix: &str, lookup: F) -> Result<(), TraversalError>
where
    R: Record,
    F: Fn(&str) -> Option<OsString>,
{
    visit(record, prefix, &mut Loader::new(lookup))
}

/// Like [`load`], but panics listing every invalid variable
///
/// Meant for startup, where a broken configuration is unrecoverable.
pub fn must_load<R: Record>(record: &mut R, prefix: &str) {
    if let Err(errors) = load(record, prefix) {
        panic!("{}", errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldDef, FieldMut, FieldRef};
    use crate::leaf::Leaf;
    use std::collections::HashMap;

    #[derive(Default)]
    struct Settings {
        port: u16,
        db_password: String,
        retries: u8,
    }

    impl Record for Settings {
        fn layout() -> &'static [FieldDef] {
            const FIELDS: &[FieldDef] = &[
                FieldDef::leaf("PORT", <u16 as Leaf>::KIND),
                FieldDef::leaf("DB_PASSWORD", <String as Leaf>::KIND),
                FieldDef::leaf("RETRIES", <u8 as Leaf>::KIND),
            ];
            FIELDS
        }

        fn fields(&self) -> Vec<FieldRef<'_>> {
            vec![
                FieldRef::Leaf("PORT", &self.port),
                FieldRef::Leaf("DB_PASSWORD", &self.db_password),
                FieldRef::Leaf("RETRIES", &self.retries),
            ]
        }

        fn fields_mut(&mut self) -> Vec<FieldMut<'_>> {
            vec![
                FieldMut::Leaf("PORT", &mut self.port),
                FieldMut::Leaf("DB_PASSWORD", &mut self.db_password),
                FieldMut::Leaf("RETRIES", &mut self.retries),
            ]
        }
    }

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<OsString> {
        let vars: HashMap<String, OsString> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), OsString::from(*v)))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_load_with_lookup() {
        let mut settings = Settings {
            retries: 3,
            ..Settings::default()
        };

        let result = load_with(
            &mut settings,
            "SVC",
            lookup(&[("SVC_PORT", "8080"), ("SVC_DB_PASSWORD", "s3cret")]),
        );

        assert!(result.is_ok());
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.db_password, "s3cret");
        assert_eq!(settings.retries, 3);
    }

    #[test]
    fn test_load_with_reports_uint_bounds() {
        let mut settings = Settings::default();

        let errors = load_with(
            &mut settings,
            "SVC",
            lookup(&[("SVC_PORT", "-1"), ("SVC_RETRIES", "300")]),
        )
        .unwrap_err();

        assert_eq!(
            errors.reasons("SVC_PORT"),
            Some(&["has a min value of 0".to_string()][..])
        );
        assert_eq!(
            errors.reasons("SVC_RETRIES"),
            Some(&["has a max value of 255".to_string()][..])
        );
        assert_eq!(settings.port, 0);
    }

    #[test]
    fn test_valid_keys_are_written_when_others_fail() {
        let mut settings = Settings::default();

        let result = load_with(
            &mut settings,
            "SVC",
            lookup(&[("SVC_PORT", "nope"), ("SVC_RETRIES", "5")]),
        );

        assert!(result.is_err());
        assert_eq!(settings.retries, 5);
    }

    #[test]
    fn test_empty_value_fails_numeric_leaf() {
        let mut settings = Settings::default();

        let errors = load_with(&mut settings, "SVC", lookup(&[("SVC_PORT", "")])).unwrap_err();

        assert_eq!(
            errors.reasons("SVC_PORT"),
            Some(&["must be a uint16".to_string()][..])
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_non_unicode_value_is_a_data_error() {
        use std::os::unix::ffi::OsStringExt;

        let mut settings = Settings::default();
        let result = load_with(&mut settings, "SVC", |key: &str| {
            (key == "SVC_PORT").then(|| OsString::from_vec(vec![0x38, 0xff]))
        });

        let errors = result.unwrap_err();
        assert_eq!(
            errors.reasons("SVC_PORT"),
            Some(&["must be valid unicode".to_string()][..])
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_non_unicode_password_is_not_kept() {
        use std::os::unix::ffi::OsStringExt;

        let mut settings = Settings::default();
        let result = load_with(&mut settings, "SVC", |key: &str| {
            (key == "SVC_DB_PASSWORD").then(|| OsString::from_vec(b"hunter2\xff".to_vec()))
        });

        assert!(!format!("{:?}", result).contains("hunter2"));
        let errors = result.unwrap_err();
        assert_eq!(
            errors.reasons("SVC_DB_PASSWORD"),
            Some(&["must be valid unicode".to_string()][..])
        );
        assert!(!errors.to_string().contains("hunter2"));
    }
}
