//! TOML configuration file mapped onto bootstrap settings.

use std::{fs, path::Path};

use anyhow::{Context, Result as AnyResult};
use serde::Deserialize;
use wator_core::{PredatorParams, PreyParams, SpawnPhase};
use wator_system_bootstrap::{BootstrapError, Probabilities, Seeding, Settings};

/// Configuration file layout.
#[derive(Debug, Deserialize)]
pub(crate) struct ConfigFile {
    ocean_state: OceanState,
    prey_params: PreySection,
    predator_params: PredatorSection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OceanState {
    width: u32,
    height: u32,
    mode: String,
    field: Option<String>,
    obstacle_probability: Option<f64>,
    prey_probability: Option<f64>,
    predator_probability: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PreySection {
    reproduce_cycle: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PredatorSection {
    reproduce_cycle: u32,
    starve_cycle: u32,
}

impl ConfigFile {
    /// Parses the configuration text.
    pub(crate) fn parse(text: &str) -> Result<Self, BootstrapError> {
        toml::from_str(text)
            .map_err(|error| BootstrapError::InvalidConfiguration(error.to_string()))
    }

    /// Resolves the seeding mode and yields bootstrap settings.
    pub(crate) fn into_settings(self, phase: SpawnPhase) -> Result<Settings, BootstrapError> {
        let seeding = self.ocean_state.seeding()?;
        Ok(Settings {
            width: self.ocean_state.width,
            height: self.ocean_state.height,
            seeding,
            prey: PreyParams {
                reproduce_cycle: self.prey_params.reproduce_cycle,
            },
            predator: PredatorParams {
                reproduce_cycle: self.predator_params.reproduce_cycle,
                starve_cycle: self.predator_params.starve_cycle,
            },
            phase,
        })
    }
}

impl OceanState {
    fn seeding(&self) -> Result<Seeding, BootstrapError> {
        match self.mode.as_str() {
            "preset" => {
                let field = self
                    .field
                    .as_deref()
                    .ok_or_else(|| missing("field", "preset"))?;
                Ok(Seeding::Preset {
                    field: strip_delimiter(field)?.to_owned(),
                })
            }
            "random" => Ok(Seeding::Random(Probabilities {
                obstacle: self
                    .obstacle_probability
                    .ok_or_else(|| missing("obstacleProbability", "random"))?,
                prey: self
                    .prey_probability
                    .ok_or_else(|| missing("preyProbability", "random"))?,
                predator: self
                    .predator_probability
                    .ok_or_else(|| missing("predatorProbability", "random"))?,
            })),
            other => Err(BootstrapError::InvalidConfiguration(format!(
                "ocean_state.mode must be \"preset\" or \"random\", found {other:?}"
            ))),
        }
    }
}

/// Drops the leading delimiter of a preset field; a `\r\n` pair counts as one.
fn strip_delimiter(field: &str) -> Result<&str, BootstrapError> {
    if let Some(rows) = field.strip_prefix("\r\n") {
        return Ok(rows);
    }
    let mut chars = field.chars();
    match chars.next() {
        Some(_) => Ok(chars.as_str()),
        None => Err(BootstrapError::InvalidConfiguration(
            "ocean_state.field must start with a delimiter character".to_owned(),
        )),
    }
}

fn missing(key: &str, mode: &str) -> BootstrapError {
    BootstrapError::InvalidConfiguration(format!(
        "ocean_state.{key} is required in {mode} mode"
    ))
}

/// Reads and resolves the configuration stored at `path`.
pub(crate) fn load(path: &Path, phase: SpawnPhase) -> AnyResult<Settings> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration from {}", path.display()))?;
    let settings = ConfigFile::parse(&text)
        .and_then(|file| file.into_settings(phase))
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRESET: &str = r#"
[ocean_state]
width = 3
height = 2
mode = "preset"
field = """
|*O*
X  """

[prey_params]
reproduceCycle = 5

[predator_params]
reproduceCycle = 8
starveCycle = 4
"#;

    const RANDOM: &str = r#"
[ocean_state]
width = 40
height = 20
mode = "random"
obstacleProbability = 0.05
preyProbability = 0.3
predatorProbability = 0.1

[prey_params]
reproduceCycle = 3

[predator_params]
reproduceCycle = 6
starveCycle = 2
"#;

    fn resolve(text: &str) -> Result<Settings, BootstrapError> {
        ConfigFile::parse(text)?.into_settings(SpawnPhase::Discrete)
    }

    #[test]
    fn preset_section_maps_onto_settings() {
        let settings = resolve(PRESET).expect("valid preset configuration");

        assert_eq!((settings.width, settings.height), (3, 2));
        assert_eq!(
            settings.seeding,
            Seeding::Preset {
                field: "*O*\nX  ".to_owned()
            }
        );
        assert_eq!(settings.prey, PreyParams { reproduce_cycle: 5 });
        assert_eq!(
            settings.predator,
            PredatorParams {
                reproduce_cycle: 8,
                starve_cycle: 4,
            }
        );
        assert_eq!(settings.phase, SpawnPhase::Discrete);
    }

    #[test]
    fn any_leading_character_is_a_delimiter() {
        for field in [r"\n*O", "|*O", " *O", r"\r\n*O", "O*O"] {
            let text = PRESET.replace("\"\"\"\n|*O*\nX  \"\"\"", &format!("\"{field}\""));

            let settings = resolve(&text).expect("preset with delimiter");
            assert_eq!(
                settings.seeding,
                Seeding::Preset {
                    field: "*O".to_owned()
                },
                "unexpected rows for {field:?}"
            );
        }
    }

    #[test]
    fn empty_field_has_no_delimiter() {
        let text = PRESET.replace("\"\"\"\n|*O*\nX  \"\"\"", "\"\"");

        let error = resolve(&text).expect_err("delimiter missing");
        assert!(matches!(error, BootstrapError::InvalidConfiguration(_)));
    }

    #[test]
    fn random_section_reads_all_probabilities() {
        let settings = resolve(RANDOM).expect("valid random configuration");

        assert_eq!(
            settings.seeding,
            Seeding::Random(Probabilities {
                obstacle: 0.05,
                prey: 0.3,
                predator: 0.1,
            })
        );
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let text = RANDOM.replace("\"random\"", "\"gaussian\"");

        let error = resolve(&text).expect_err("unknown mode");
        assert!(matches!(error, BootstrapError::InvalidConfiguration(_)));
    }

    #[test]
    fn preset_without_field_is_rejected() {
        let text = RANDOM.replace("\"random\"", "\"preset\"");

        let error = resolve(&text).expect_err("field missing");
        assert_eq!(
            error,
            BootstrapError::InvalidConfiguration(
                "ocean_state.field is required in preset mode".to_owned()
            )
        );
    }

    #[test]
    fn random_without_probability_is_rejected() {
        let text = RANDOM.replace("preyProbability = 0.3\n", "");

        let error = resolve(&text).expect_err("probability missing");
        assert_eq!(
            error,
            BootstrapError::InvalidConfiguration(
                "ocean_state.preyProbability is required in random mode".to_owned()
            )
        );
    }

    #[test]
    fn malformed_values_are_invalid_configuration() {
        for text in [
            RANDOM.replace("reproduceCycle = 3", "reproduceCycle = -3"),
            RANDOM.replace("width = 40", "width = \"wide\""),
            RANDOM.replace("[predator_params]", "[predators]"),
            "not = [valid".to_owned(),
        ] {
            let error = resolve(&text).expect_err("malformed configuration");
            assert!(
                matches!(error, BootstrapError::InvalidConfiguration(_)),
                "unexpected error: {error}"
            );
        }
    }

    #[test]
    fn missing_file_reports_the_path() {
        let error = load(Path::new("does/not/exist.toml"), SpawnPhase::Stochastic)
            .expect_err("file is absent");

        assert!(format!("{error:#}").contains("does/not/exist.toml"));
    }
}
