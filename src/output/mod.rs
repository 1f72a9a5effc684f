// src/output/mod.rs
//! Presentation of finished batches: console text, legacy CSV, JSON.

pub mod console;
pub mod delimited;
pub mod json;

/// `count / total_tokens`; `None` for an empty document.
pub fn relative_frequency(count: u64, total_tokens: u64) -> Option<f64> {
    if total_tokens == 0 {
        None
    } else {
        Some(count as f64 / total_tokens as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_of_empty_document_is_none() {
        assert_eq!(relative_frequency(0, 0), None);
        assert_eq!(relative_frequency(1, 4), Some(0.25));
    }
}
