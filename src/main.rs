use anyhow::Result;
use clap::Parser;
use family_portrait::app::App;
use family_portrait::models::{BackgroundMode, Config, ImageFile};
use family_portrait::preview::PreviewRegistry;
use family_portrait::session::{GenerateOutcome, Session};
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "family-portrait")]
#[command(about = "Merge photos of people into one family portrait")]
struct CliArgs {
    /// Photos of the people to include, in order.
    #[arg(value_name = "PEOPLE", required = true)]
    people: Vec<PathBuf>,

    /// Text description of the background.
    #[arg(long, conflicts_with = "background_image")]
    background_prompt: Option<String>,

    /// Image to use as the background instead of a text description.
    #[arg(long, value_name = "PATH")]
    background_image: Option<PathBuf>,

    /// Directory the portrait is written to.
    #[arg(long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,
}

fn load_files(paths: &[PathBuf]) -> family_portrait::Result<Vec<ImageFile>> {
    paths.iter().map(ImageFile::from_path).collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "family_portrait=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };

    let people = match load_files(&args.people) {
        Ok(files) => files,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let app = App::new(&config);
    let mut session = Session::new(PreviewRegistry::new());
    session.add_files(people);

    if let Some(prompt) = args.background_prompt {
        session.set_background_prompt(prompt);
    }
    if let Some(path) = &args.background_image {
        match ImageFile::from_path(path) {
            Ok(file) => {
                session.set_background_image(Some(file));
                session.set_background_mode(BackgroundMode::Image);
            }
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        }
    }

    info!(
        "Starting family-portrait with {} photo(s)",
        session.files().len()
    );

    match session.generate(&app).await {
        GenerateOutcome::Generated => {
            if let Some(text) = session.generated_text() {
                info!("Model says: {}", text);
            }
            match session.download(&args.output_dir).await {
                Ok(path) => {
                    info!("Portrait saved to {}", path.display());
                    Ok(())
                }
                Err(e) => {
                    error!("Failed to save portrait: {}", e);
                    std::process::exit(1);
                }
            }
        }
        outcome => {
            if let Some(notice) = session.notice() {
                match outcome {
                    GenerateOutcome::NoImage => warn!("{}", notice.message),
                    _ => error!("{}", notice.message),
                }
            }
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_cli_parses_people_and_prompt() {
        let args = CliArgs::try_parse_from([
            "family-portrait",
            "mum.jpg",
            "dad.png",
            "--background-prompt",
            "a beach at sunset",
        ])
        .unwrap();
        assert_eq!(args.people.len(), 2);
        assert_eq!(args.background_prompt.as_deref(), Some("a beach at sunset"));
        assert!(args.background_image.is_none());
        assert_eq!(args.output_dir, PathBuf::from("."));
    }

    #[test]
    fn test_cli_requires_people() {
        assert!(CliArgs::try_parse_from(["family-portrait"]).is_err());
    }

    #[test]
    fn test_cli_background_inputs_conflict() {
        let result = CliArgs::try_parse_from([
            "family-portrait",
            "mum.jpg",
            "--background-prompt",
            "a lake",
            "--background-image",
            "lake.png",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_files_rejects_unsupported_types() {
        let err = load_files(&[PathBuf::from("a.jpg"), PathBuf::from("notes.txt")]).unwrap_err();
        assert!(matches!(err, family_portrait::Error::Precondition(_)));
    }
}
