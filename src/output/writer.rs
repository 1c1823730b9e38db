use crate::classify::ClassificationResult;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const CORE_KEYS_FILE: &str = "core_keys.txt";
pub const IGNORED_KEYS_FILE: &str = "ignored_keys.txt";
pub const REMAINING_KEYS_FILE: &str = "remaining_keys.txt";

/// Writes classified key sets as line-delimited files, one key per line
pub struct KeySetWriter {
    output_dir: PathBuf,
    write_ignored: bool,
}

impl KeySetWriter {
    /// Create a writer for `output_dir`, creating the directory if needed
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Result<Self> {
        std::fs::create_dir_all(&output_dir)
            .context("Failed to create output directory")?;

        Ok(KeySetWriter {
            output_dir: output_dir.as_ref().to_path_buf(),
            write_ignored: true,
        })
    }

    /// Leave `ignored_keys.txt` out
    pub fn without_ignored(mut self) -> Self {
        self.write_ignored = false;
        self
    }

    /// Write each key set to its file and return the paths written
    pub fn write(&self, result: &ClassificationResult) -> Result<Vec<PathBuf>> {
        let mut sets = vec![(CORE_KEYS_FILE, &result.core)];
        if self.write_ignored {
            sets.push((IGNORED_KEYS_FILE, &result.ignored));
        }
        sets.push((REMAINING_KEYS_FILE, &result.remaining));

        let mut written = Vec::with_capacity(sets.len());
        for (name, keys) in sets {
            let path = self.output_dir.join(name);
            let file = File::create(&path)
                .with_context(|| format!("Failed to open file: {}", path.display()))?;

            let mut out = BufWriter::new(file);
            write_keys(&mut out, keys)
                .with_context(|| format!("Failed to write keys to {}", path.display()))?;
            out.flush().context("Failed to flush writer")?;

            written.push(path);
        }
        Ok(written)
    }
}

/// Write keys one per line. Callers pass sorted, distinct keys.
pub fn write_keys<W, I, S>(mut writer: W, keys: I) -> std::io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for key in keys {
        writeln!(writer, "{}", key.as_ref())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;

    #[test]
    fn test_write_keys() {
        let mut buffer = Vec::new();
        write_keys(&mut buffer, ["a", "b"]).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "a\nb\n");
    }

    #[test]
    fn test_key_set_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("keys");
        let result = classify(["title", "Author", "Unknown", "Content-Type", "X-Parsed-By"]);

        let written = KeySetWriter::new(&out).unwrap().write(&result).unwrap();
        assert_eq!(written.len(), 3);

        let core = std::fs::read_to_string(out.join(CORE_KEYS_FILE)).unwrap();
        assert_eq!(core, "Author\ntitle\n");
        let ignored = std::fs::read_to_string(out.join(IGNORED_KEYS_FILE)).unwrap();
        assert_eq!(ignored, "Unknown\n");
        let remaining = std::fs::read_to_string(out.join(REMAINING_KEYS_FILE)).unwrap();
        assert_eq!(remaining, "Content-Type\nX-Parsed-By\n");
    }

    #[test]
    fn test_without_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let result = classify(["Unknown", "title"]);

        let written = KeySetWriter::new(dir.path())
            .unwrap()
            .without_ignored()
            .write(&result)
            .unwrap();

        assert_eq!(written.len(), 2);
        assert!(!dir.path().join(IGNORED_KEYS_FILE).exists());
        assert!(dir.path().join(REMAINING_KEYS_FILE).exists());
    }
}
