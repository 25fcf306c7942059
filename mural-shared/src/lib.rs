pub mod broker;
pub mod messages;
pub mod settings;
pub mod telemetry;
pub mod websocket;

///
/// Formats an error and its whole source chain, one cause per line.
///
pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
