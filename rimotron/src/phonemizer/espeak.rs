//! Phonemization through an `espeak-ng` child process.
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use language_tags::LanguageTag;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::{Phonemizer, PhonemizerError};
use crate::constants::STRESS_MARKS;
use crate::pronunciation::Pronunciation;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EspeakConfig {
    /// Executable name or path
    pub binary: PathBuf,
    /// espeak voice, e.g. `fr-fr`
    pub voice: String,
    /// Character placed between phonemes in the engine output
    pub separator: char,
}

impl Default for EspeakConfig {
    fn default() -> EspeakConfig {
        EspeakConfig {
            binary: PathBuf::from("espeak-ng"),
            voice: "fr-fr".to_string(),
            separator: '_',
        }
    }
}

impl EspeakConfig {
    pub fn for_language(tag: &LanguageTag) -> EspeakConfig {
        EspeakConfig {
            voice: tag.to_string().to_lowercase(),
            ..EspeakConfig::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EspeakPhonemizer {
    config: EspeakConfig,
}

impl EspeakPhonemizer {
    pub fn new(config: EspeakConfig) -> EspeakPhonemizer {
        EspeakPhonemizer { config }
    }

    pub fn config(&self) -> &EspeakConfig {
        &self.config
    }
}

/// Splits engine output on the separator and whitespace, dropping stress
/// marks and empty tokens.
pub(crate) fn parse_output(output: &str, separator: char) -> Pronunciation {
    output
        .split(|c: char| c == separator || c.is_whitespace())
        .map(|token| {
            token
                .chars()
                .filter(|c| !STRESS_MARKS.contains(c))
                .collect::<String>()
        })
        .filter(|token| !token.is_empty())
        .map(SmolStr::from)
        .collect()
}

impl Phonemizer for EspeakPhonemizer {
    fn phonemize(&self, text: &str) -> Result<Pronunciation, PhonemizerError> {
        let binary = self.config.binary.display().to_string();

        // Text goes through stdin so that input starting with `-` is never
        // taken for an option.
        let mut child = Command::new(&self.config.binary)
            .arg("-q")
            .arg("--ipa")
            .arg(format!("--sep={}", self.config.separator))
            .arg("-v")
            .arg(&self.config.voice)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| PhonemizerError::Spawn(binary.clone(), e))?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(text.as_bytes()) {
                drop(stdin);
                let _ = child.kill();
                let _ = child.wait();
                return Err(PhonemizerError::Spawn(binary, e));
            }
        }

        let output = child
            .wait_with_output()
            .map_err(|e| PhonemizerError::Spawn(binary, e))?;

        if !output.status.success() {
            return Err(PhonemizerError::Failed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let pron = parse_output(&String::from_utf8_lossy(&output.stdout), self.config.separator);
        log::trace!("espeak {:?} -> {}", text, pron);

        if pron.is_empty() {
            return Err(PhonemizerError::Empty(text.to_string()));
        }

        Ok(pron)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_output_drops_stress_and_separators() {
        let pron = parse_output(" b_ɔ̃_ʒ_ˈu_ʁ\n", '_');
        assert_eq!(pron, Pronunciation::parse("b ɔ̃ ʒ u ʁ"));
    }

    #[test]
    fn parse_output_joins_words() {
        let pron = parse_output("l_ə ʃ_ˈa\n", '_');
        assert_eq!(pron.phonemes(), &["l", "ə", "ʃ", "a"]);
        assert!(parse_output("  \n", '_').is_empty());
    }

    #[test]
    fn voice_from_language_tag() {
        let tag = LanguageTag::parse("fr-CA").unwrap();
        let config = EspeakConfig::for_language(&tag);
        assert_eq!(config.voice, "fr-ca");
        assert_eq!(config.binary, PathBuf::from("espeak-ng"));
    }

    #[test]
    fn missing_binary_is_a_spawn_error() {
        let g2p = EspeakPhonemizer::new(EspeakConfig {
            binary: PathBuf::from("/nonexistent/espeak-ng-for-tests"),
            ..EspeakConfig::default()
        });

        assert!(matches!(
            g2p.phonemize("bonjour"),
            Err(PhonemizerError::Spawn(_, _))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn engine_exiting_before_reading_input_is_a_spawn_error() {
        // `true` exits without reading stdin, so a write larger than the
        // pipe buffer fails with a broken pipe.
        let g2p = EspeakPhonemizer::new(EspeakConfig {
            binary: PathBuf::from("true"),
            ..EspeakConfig::default()
        });
        let text = "a".repeat(1 << 20);

        assert!(matches!(
            g2p.phonemize(&text),
            Err(PhonemizerError::Spawn(_, _))
        ));
    }
}
