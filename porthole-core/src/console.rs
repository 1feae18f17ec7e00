//! Console-style commands exposed by the serving process.

use anyhow::Context as _;

/// The URL the local process serves its remote UI on.
pub fn serve_url(port: u16) -> String {
    format!("http://localhost:{port}")
}

/// Open the remote UI for this process in the system browser.
pub fn open_in_browser(port: u16) -> anyhow::Result<()> {
    let url = serve_url(port);
    log::info!("opening {url}");
    open::that(&url).with_context(|| format!("failed to open {url}"))?;
    Ok(())
}
