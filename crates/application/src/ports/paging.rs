use rolevault_core::{AppError, AppResult};

/// Validates `fetch_limit` arguments before they reach a store.
///
/// Every adapter calls this first, so a negative offset or row count fails
/// as `Validation` everywhere instead of surfacing as a driver error in one
/// store and a silently clamped page in another.
pub fn validate_page(offset: i64, row_count: i64) -> AppResult<()> {
    if offset < 0 {
        return Err(AppError::Validation(format!(
            "page offset must not be negative, got {offset}"
        )));
    }
    if row_count < 0 {
        return Err(AppError::Validation(format!(
            "page row count must not be negative, got {row_count}"
        )));
    }

    Ok(())
}
