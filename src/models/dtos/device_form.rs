use crate::models::DeviceRecord;
use serde::Deserialize;

/// Fields of the add-device dashboard form.
#[derive(Deserialize, Debug)]
pub struct DeviceFormDto {
    pub device: String,
    pub ip: String,
    pub model: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
}

impl DeviceFormDto {
    pub fn into_record(self) -> DeviceRecord {
        DeviceRecord {
            name: self.device.trim().to_owned(),
            address: self.ip.trim().to_owned(),
            model: self.model.trim().to_owned(),
            user: self.user.trim().to_owned(),
            password: self.password.trim().to_owned(),
        }
    }
}

/// The edit form carries the name the record was stored under, which may
/// differ from the (possibly renamed) device field.
#[derive(Deserialize, Debug)]
pub struct EditDeviceFormDto {
    pub original_name: String,
    pub device: String,
    pub ip: String,
    pub model: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
}

impl EditDeviceFormDto {
    pub fn into_parts(self) -> (String, DeviceRecord) {
        let record = DeviceRecord {
            name: self.device.trim().to_owned(),
            address: self.ip.trim().to_owned(),
            model: self.model.trim().to_owned(),
            user: self.user.trim().to_owned(),
            password: self.password.trim().to_owned(),
        };
        (self.original_name, record)
    }
}
