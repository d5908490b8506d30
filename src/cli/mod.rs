//! Handles Command Line Interface (CLI) related functionalities.
//!
//! Includes defining commands, parsing arguments, rendering results as tables,
//! and the prompts used by the interactive menu.

mod commands;
pub mod render;

pub use commands::*;
use crate::error::Result;
use crate::models::Pollutant;
use dialoguer::{theme::ColorfulTheme, FuzzySelect, Input};
use std::path::PathBuf;

/// Prompt for a path to an existing file.
pub fn prompt_path(prompt: &str) -> Result<PathBuf> {
    let raw: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .validate_with(|input: &String| -> std::result::Result<(), &str> {
            if PathBuf::from(input.trim()).is_file() {
                Ok(())
            } else {
                Err("File does not exist")
            }
        })
        .interact_text()?;
    Ok(PathBuf::from(raw.trim()))
}

/// Prompt for an optional path; an empty answer means none.
pub fn prompt_optional_path(prompt: &str) -> Result<Option<PathBuf>> {
    let raw: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;
    let raw = raw.trim();
    Ok((!raw.is_empty()).then(|| PathBuf::from(raw)))
}

/// Prompt for a pollutant from the canonical list; typing filters the choices.
pub fn prompt_pollutant() -> Result<Pollutant> {
    let names: Vec<&str> = Pollutant::ALL.iter().map(|p| p.display_name()).collect();
    let index = FuzzySelect::with_theme(&ColorfulTheme::default())
        .with_prompt("Pollutant")
        .items(&names)
        .default(0)
        .interact()?;
    Ok(Pollutant::ALL[index])
}

/// Prompt for a concentration in µg/m³.
pub fn prompt_concentration() -> Result<f64> {
    let value: f64 = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Concentration (µg/m³)")
        .interact_text()?;
    Ok(value)
}
