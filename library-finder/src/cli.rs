//! Interactive terminal prompt.
//!
//! Asks for a postcode, reports the nearest library, then asks how many
//! more to list.

use dialoguer::{Input, theme::ColorfulTheme};

use crate::domain::{Coordinate, InvalidPostcode, Library, Postcode};
use crate::finder::{FindError, Freshness, LibraryFinder};
use crate::geo::distance_km;
use crate::store::StoreError;

/// Errors that end an interactive session.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error(transparent)]
    Postcode(#[from] InvalidPostcode),

    #[error(transparent)]
    Find(#[from] FindError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Run one interactive lookup against `finder`.
pub async fn run(finder: &LibraryFinder) -> Result<(), CliError> {
    let theme = ColorfulTheme::default();

    if let Freshness::Degraded(err) = finder.refresh_if_stale().await? {
        println!("Could not refresh library data ({err}); using cached data.");
    }

    let postcode = prompt_postcode(&theme)?;

    let location = match finder.locate_postcode(&postcode).await {
        Ok(location) => location,
        Err(FindError::InvalidInput(_)) => {
            println!("Invalid postcode");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let nearest = finder.resolve_nearest(location, 1).await?;
    let Some(first) = nearest.first() else {
        println!("No libraries found");
        return Ok(());
    };
    println!("The nearest library is {}", first.name);

    let count: i64 = Input::with_theme(&theme)
        .with_prompt("How many libraries do you want to find?")
        .interact_text()?;
    let count = usize::try_from(count).unwrap_or(0);

    let libraries = finder.resolve_nearest(location, count).await?;
    println!("The nearest {count} libraries are:");
    for line in format_listing(location, &libraries) {
        println!("{line}");
    }

    Ok(())
}

/// Prompt until the input is shaped like a postcode.
fn prompt_postcode(theme: &ColorfulTheme) -> Result<Postcode, CliError> {
    let raw: String = Input::with_theme(theme)
        .with_prompt("Please enter a postcode")
        .validate_with(|input: &String| Postcode::parse(input).map(|_| ()))
        .interact_text()?;

    Ok(Postcode::parse(&raw)?)
}

/// One numbered line per library, with its distance from `from`.
///
/// Libraries are listed in the order given.
pub fn format_listing(from: Coordinate, libraries: &[Library]) -> Vec<String> {
    libraries
        .iter()
        .enumerate()
        .map(|(i, library)| {
            let distance = distance_km(from, library.location);
            format!("{:>3}. {} ({distance:.1} km)", i + 1, library.name)
        })
        .collect()
}
