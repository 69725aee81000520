use releve_core::error::ReleveError;
use releve_core::Conversion;
use serde_json::json;

/// Bank, source and transactions, without the parse trace.
pub fn render(conversion: &Conversion) -> Result<String, ReleveError> {
    let value = json!({
        "bank": conversion.bank,
        "source": conversion.source,
        "transactions": conversion.transactions,
    });
    Ok(serde_json::to_string_pretty(&value)?)
}
