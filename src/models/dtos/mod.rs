pub mod device_form;
pub mod ingest;
