//! Package manifest regeneration.
//!
//! The post-processor discards any existing signing metadata and writes a
//! minimal `META-INF/MANIFEST.MF` from scratch. Digest values are a fixed
//! placeholder, not content hashes: the regenerated manifest is
//! non-authoritative and installers that verify it must re-sign the package.

/// Archive path of the regenerated manifest.
pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";

/// The one digest value written for every entry.
pub const PLACEHOLDER_DIGEST: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=";

/// Whether an archive entry is signing metadata to strip before rebuilding.
///
/// Matches the manifest itself plus signature files and signature blocks
/// directly under `META-INF/`.
pub fn is_signature_entry(name: &str) -> bool {
    let Some(rest) = name.strip_prefix("META-INF/") else {
        return false;
    };
    if rest.contains('/') {
        return false;
    }
    if rest == "MANIFEST.MF" {
        return true;
    }
    let upper = rest.to_ascii_uppercase();
    [".SF", ".RSA", ".DSA", ".EC"]
        .iter()
        .any(|ext| upper.ends_with(ext))
}

/// Renders a manifest with one named section per entry.
///
/// `entries` must use `/`-separated archive paths; the caller sorts them so
/// repeated runs produce identical bytes.
pub fn render_manifest(entries: &[String]) -> String {
    let mut manifest = String::from("Manifest-Version: 1.0\nCreated-By: apkforge\n\n");
    for entry in entries {
        manifest.push_str(&format!(
            "Name: {entry}\nSHA-256-Digest: {PLACEHOLDER_DIGEST}\n\n"
        ));
    }
    manifest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_entries_are_recognized() {
        assert!(is_signature_entry("META-INF/MANIFEST.MF"));
        assert!(is_signature_entry("META-INF/CERT.SF"));
        assert!(is_signature_entry("META-INF/CERT.RSA"));
        assert!(is_signature_entry("META-INF/KEY.DSA"));
        assert!(is_signature_entry("META-INF/app.ec"));
    }

    #[test]
    fn payload_entries_are_kept() {
        assert!(!is_signature_entry("classes.dex"));
        assert!(!is_signature_entry("res/layout/main.xml"));
        // Non-signature metadata under META-INF survives
        assert!(!is_signature_entry("META-INF/services/com.example.Spi"));
        assert!(!is_signature_entry("META-INF/versions/9/module-info.class"));
    }

    #[test]
    fn every_section_gets_the_same_placeholder() {
        let manifest =
            render_manifest(&["classes.dex".to_string(), "resources.arsc".to_string()]);
        assert_eq!(manifest.matches(PLACEHOLDER_DIGEST).count(), 2);
        assert!(manifest.starts_with("Manifest-Version: 1.0\n"));
        assert!(manifest.contains("Name: classes.dex\n"));
    }
}
