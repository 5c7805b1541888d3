//! Launch-at-login via a user LaunchAgent.
//!
//! Writes a plist under `~/Library/LaunchAgents` that starts `workchime run`
//! at login. Registration failures are reported to the caller; they are
//! never fatal to the rest of the app.

use std::path::PathBuf;

const LABEL: &str = "com.workchime.agent";

fn plist_path() -> Result<PathBuf, std::io::Error> {
    let home = dirs::home_dir().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::NotFound, "home directory not found")
    })?;
    let dir = home.join("Library").join("LaunchAgents");
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join(format!("{LABEL}.plist")))
}

pub fn is_enabled() -> bool {
    plist_path().map(|p| p.exists()).unwrap_or(false)
}

pub fn enable() -> Result<(), Box<dyn std::error::Error>> {
    let exe = std::env::current_exe()?;
    let plist = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>Label</key>
    <string>{LABEL}</string>
    <key>ProgramArguments</key>
    <array>
        <string>{exe}</string>
        <string>run</string>
    </array>
    <key>RunAtLoad</key>
    <true/>
</dict>
</plist>
"#,
        exe = xml_escape(&exe.to_string_lossy()),
    );
    std::fs::write(plist_path()?, plist)?;
    Ok(())
}

pub fn disable() -> Result<(), Box<dyn std::error::Error>> {
    let path = plist_path()?;
    if path.exists() {
        std::fs::remove_file(path)?;
    }
    Ok(())
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xml_escape_handles_metacharacters() {
        assert_eq!(xml_escape("/Users/a&b/<bin>"), "/Users/a&amp;b/&lt;bin&gt;");
        assert_eq!(
            xml_escape("/usr/local/bin/workchime"),
            "/usr/local/bin/workchime"
        );
    }
}
