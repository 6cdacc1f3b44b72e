pub mod radiopharmaceutical;
pub mod rwvm;
pub mod tags;

pub use radiopharmaceutical::extract_radiotracer;
pub use rwvm::{
    extract_coded_value, extract_mapping_records, extract_quantity_and_units,
    extract_referenced_instances, extract_referenced_series_uid, is_rwvm_instance, RWVM_MODALITY,
};
pub use tags::*;
