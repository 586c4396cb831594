use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voxroute::domain::speech::{SpeechRequest, SpeechService, SpeechServiceApi};
use voxroute::infrastructure::audio::{AudioCache, Playback, RodioPlayer};
use voxroute::infrastructure::config::{default_settings_path, Settings};
use voxroute::infrastructure::engines::DefaultEngineFactory;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse(std::env::args().skip(1))?;

    init_logging();

    let settings_path = args
        .config
        .clone()
        .unwrap_or_else(default_settings_path);
    let settings = Arc::new(Settings::load(&settings_path)?);

    tracing::info!(
        engine = %settings.tts.engine,
        settings = %settings_path.display(),
        "starting voxroute"
    );

    let cache = Arc::new(AudioCache::new(settings.cache_dir()));

    if args.clear_cache {
        let removed = cache.clear()?;
        tracing::info!(removed, "audio cache cleared");
        return Ok(());
    }

    let player: Arc<dyn Playback> = Arc::new(RodioPlayer);
    let engines = Arc::new(DefaultEngineFactory::new()?);
    let service = SpeechService::new(settings, cache, player, engines);

    let request = SpeechRequest {
        text: args.text,
        style: args.style,
        style_degree: args.style_degree,
    };
    service.speak(request).await?;

    Ok(())
}

struct CliArgs {
    text: String,
    style: Option<String>,
    style_degree: Option<f32>,
    config: Option<PathBuf>,
    clear_cache: bool,
}

impl CliArgs {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, String> {
        let mut text_parts: Vec<String> = Vec::new();
        let mut style = None;
        let mut style_degree = None;
        let mut config = None;
        let mut clear_cache = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--clear-cache" => clear_cache = true,
                "--style" => {
                    style = Some(args.next().ok_or("--style requires a value")?);
                }
                "--style-degree" => {
                    let raw = args.next().ok_or("--style-degree requires a value")?;
                    style_degree = Some(
                        raw.parse::<f32>()
                            .map_err(|_| format!("invalid --style-degree '{raw}'"))?,
                    );
                }
                "--config" => {
                    config = Some(PathBuf::from(
                        args.next().ok_or("--config requires a value")?,
                    ));
                }
                other => text_parts.push(other.to_string()),
            }
        }

        let text = text_parts.join(" ");
        if text.trim().is_empty() && !clear_cache {
            return Err(
                "usage: voxroute [--config <file>] [--style <name>] [--style-degree <n>] <text> | --clear-cache"
                    .to_string(),
            );
        }

        Ok(Self {
            text,
            style,
            style_degree,
            config,
            clear_cache,
        })
    }
}

fn init_logging() {
    let fmt_layer = tracing_subscriber::fmt::layer();
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "voxroute=debug".into());

    if std::env::var("LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.pretty())
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(words: &[&str]) -> Result<CliArgs, String> {
        CliArgs::parse(words.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_bare_text() {
        let args = parse(&["hello", "there"]).unwrap();
        assert_eq!(args.text, "hello there");
        assert_eq!(args.style, None);
        assert_eq!(args.style_degree, None);
    }

    #[test]
    fn test_parse_style_flags() {
        let args = parse(&["--style", "cheerful", "--style-degree", "1.5", "hi"]).unwrap();
        assert_eq!(args.style.as_deref(), Some("cheerful"));
        assert_eq!(args.style_degree, Some(1.5));
        assert_eq!(args.text, "hi");
    }

    #[test]
    fn test_parse_rejects_empty_text() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["--style", "cheerful"]).is_err());
    }

    #[test]
    fn test_parse_rejects_bad_style_degree() {
        assert!(parse(&["--style-degree", "loud", "hi"]).is_err());
    }

    #[test]
    fn test_parse_clear_cache_needs_no_text() {
        let args = parse(&["--clear-cache"]).unwrap();
        assert!(args.clear_cache);
        assert_eq!(args.text, "");
    }
}
