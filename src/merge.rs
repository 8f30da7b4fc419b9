//! Right-biased recursive merge of decoded documents.

use indexmap::map::Entry;

use crate::error::LoadError;
use crate::value::ConfigValue;

/// Fold an ordered document list into one tree, later documents winning.
///
/// A single document is returned unchanged. An empty list is an error: it
/// means no file in the load produced any configuration content.
pub fn merge_documents(documents: Vec<ConfigValue>) -> Result<ConfigValue, LoadError> {
    let mut documents = documents.into_iter();
    let first = documents.next().ok_or(LoadError::EmptyConfiguration)?;
    Ok(documents.fold(first, deep_merge))
}

/// Merge `overlay` onto `base`.
///
/// Two mappings merge key-by-key, recursing only when both sides hold a
/// mapping under the same key; any other collision takes the overlay value
/// wholesale. Sequences are atomic: replaced, never concatenated. Base keys
/// keep their positions; new overlay keys append in overlay order.
pub fn deep_merge(base: ConfigValue, overlay: ConfigValue) -> ConfigValue {
    match (base, overlay) {
        (ConfigValue::Mapping(mut base), ConfigValue::Mapping(overlay)) => {
            for (key, value) in overlay {
                match base.entry(key) {
                    Entry::Occupied(mut slot) => {
                        let current = std::mem::take(slot.get_mut());
                        slot.insert(deep_merge(current, value));
                    }
                    Entry::Vacant(slot) => {
                        slot.insert(value);
                    }
                }
            }
            ConfigValue::Mapping(base)
        }
        (_, overlay) => overlay,
    }
}
