use crate::errors::ApiError;

/// Separates fields within a registry line; no field may contain it.
pub const FIELD_DELIMITER: char = ':';

/// One device entry of the flat-file registry,
/// `name:address:model[:user[:password]]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRecord {
    pub name: String,
    pub address: String,
    pub model: String,
    pub user: String,
    pub password: String,
}

impl DeviceRecord {
    /// Parses one registry line. Lines with fewer than three fields are not
    /// records and yield `None`; trailing fields beyond the fifth are ignored.
    pub fn parse_line(line: &str) -> Option<Self> {
        let parts = line.trim().split(FIELD_DELIMITER).collect::<Vec<_>>();
        if parts.len() < 3 {
            return None;
        }
        Some(Self {
            name: parts[0].to_owned(),
            address: parts[1].to_owned(),
            model: parts[2].to_owned(),
            user: parts.get(3).copied().unwrap_or_default().to_owned(),
            password: parts.get(4).copied().unwrap_or_default().to_owned(),
        })
    }

    /// Formats the record as a registry line, always writing all five fields.
    pub fn to_line(&self) -> String {
        [
            self.name.as_str(),
            self.address.as_str(),
            self.model.as_str(),
            self.user.as_str(),
            self.password.as_str(),
        ]
        .join(&FIELD_DELIMITER.to_string())
    }

    /// A field containing the delimiter would corrupt the line format.
    pub fn validate(&self) -> Result<(), ApiError> {
        let fields = [
            ("name", &self.name),
            ("address", &self.address),
            ("model", &self.model),
            ("user", &self.user),
            ("password", &self.password),
        ];
        for (label, value) in fields {
            if value.contains(FIELD_DELIMITER) {
                return Err(ApiError::FieldContainsDelimiter(label));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_line() {
        let record = DeviceRecord::parse_line("core-sw1:10.0.0.1:ios:admin:secret").unwrap();
        assert_eq!(record.name, "core-sw1");
        assert_eq!(record.address, "10.0.0.1");
        assert_eq!(record.model, "ios");
        assert_eq!(record.user, "admin");
        assert_eq!(record.password, "secret");
    }

    #[test]
    fn test_parse_optional_fields_default_to_empty() {
        let record = DeviceRecord::parse_line("edge-fw:192.168.1.1:asa").unwrap();
        assert_eq!(record.user, "");
        assert_eq!(record.password, "");

        let record = DeviceRecord::parse_line("edge-fw:192.168.1.1:asa:ops").unwrap();
        assert_eq!(record.user, "ops");
        assert_eq!(record.password, "");
    }

    #[test]
    fn test_parse_rejects_short_lines() {
        assert!(DeviceRecord::parse_line("").is_none());
        assert!(DeviceRecord::parse_line("just-a-name").is_none());
        assert!(DeviceRecord::parse_line("name:address").is_none());
    }

    #[test]
    fn test_parse_trims_surrounding_whitespace() {
        let record = DeviceRecord::parse_line("  r1:10.0.0.2:junos  \n").unwrap();
        assert_eq!(record.name, "r1");
        assert_eq!(record.model, "junos");
    }

    #[test]
    fn test_line_round_trip() {
        let record = DeviceRecord {
            name: "r1".into(),
            address: "10.0.0.2".into(),
            model: "junos".into(),
            user: "".into(),
            password: "".into(),
        };
        assert_eq!(record.to_line(), "r1:10.0.0.2:junos::");
        assert_eq!(DeviceRecord::parse_line(&record.to_line()).unwrap(), record);
    }

    #[test]
    fn test_validate_rejects_delimiter_in_fields() {
        let mut record = DeviceRecord {
            name: "r1".into(),
            address: "10.0.0.2".into(),
            model: "junos".into(),
            user: "".into(),
            password: "".into(),
        };
        assert!(record.validate().is_ok());
        record.password = "pa:ss".into();
        assert!(record.validate().is_err());
    }
}
