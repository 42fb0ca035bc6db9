// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Proteus CLI entrypoint.
//!
//! Runs the interactive inspector panel against an in-process context store. A context
//! JSON file (or `--demo`) seeds the store and starts the session connected; without one
//! the session starts in preview mode, driven by the screen manifest.

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use proteus::host::{HostStore, MemoryHost};
use proteus::panel::{self, PanelOptions};

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<context.json>] [options]\n  {program} --context <file> [options]\n  {program} --demo [options]\n\nOptions:\n  --key <name>          context key on the host store (default screen_context)\n  --prefs-dir <dir>     directory for persisted selections (default: in-memory only)\n  --local-base <url>    base URL of the local dev server\n  --cdn-base <url>      base URL of the screen-context CDN\n  --debounce-ms <n>     write-back debounce in milliseconds (default 400)\n  --screen <top:child>  default screen for preview sessions\n\nWith a context file (or --demo) the session starts connected and edits sync back\nto the store. Without one the session starts in preview mode."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    context_file: Option<String>,
    demo: bool,
    key: Option<String>,
    prefs_dir: Option<String>,
    local_base: Option<String>,
    cdn_base: Option<String>,
    debounce_ms: Option<u64>,
    screen: Option<String>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--demo" => {
                if options.demo {
                    return Err(());
                }
                options.demo = true;
            }
            "--context" => {
                if options.context_file.is_some() {
                    return Err(());
                }
                let file = args.next().ok_or(())?;
                options.context_file = Some(file);
            }
            "--key" => {
                if options.key.is_some() {
                    return Err(());
                }
                options.key = Some(args.next().ok_or(())?);
            }
            "--prefs-dir" => {
                if options.prefs_dir.is_some() {
                    return Err(());
                }
                options.prefs_dir = Some(args.next().ok_or(())?);
            }
            "--local-base" => {
                if options.local_base.is_some() {
                    return Err(());
                }
                options.local_base = Some(args.next().ok_or(())?);
            }
            "--cdn-base" => {
                if options.cdn_base.is_some() {
                    return Err(());
                }
                options.cdn_base = Some(args.next().ok_or(())?);
            }
            "--debounce-ms" => {
                if options.debounce_ms.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                let millis: u64 = raw.parse().map_err(|_| ())?;
                options.debounce_ms = Some(millis);
            }
            "--screen" => {
                if options.screen.is_some() {
                    return Err(());
                }
                options.screen = Some(args.next().ok_or(())?);
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.context_file.is_some() {
                    return Err(());
                }
                options.context_file = Some(arg);
            }
        }
    }

    if options.demo && options.context_file.is_some() {
        return Err(());
    }

    Ok(options)
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "proteus".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let context_key =
            options.key.clone().unwrap_or_else(|| panel::DEFAULT_CONTEXT_KEY.to_owned());

        let store = Arc::new(MemoryHost::new());
        if options.demo {
            store.set(&context_key, panel::demo_context());
        } else if let Some(file) = &options.context_file {
            let text = std::fs::read_to_string(file)
                .map_err(|err| format!("cannot read context file {file}: {err}"))?;
            let value = serde_json::from_str(&text)
                .map_err(|err| format!("context file {file} is not valid JSON: {err}"))?;
            store.set(&context_key, value);
        }

        let mut panel_options = PanelOptions {
            context_key,
            prefs_dir: options.prefs_dir.clone().map(Into::into),
            default_screen: options.screen.clone(),
            ..PanelOptions::default()
        };
        if let Some(local_base) = options.local_base.clone() {
            panel_options.local_base = local_base;
        }
        if let Some(cdn_base) = options.cdn_base.clone() {
            panel_options.cdn_base = cdn_base;
        }
        if let Some(millis) = options.debounce_ms {
            panel_options.debounce = Duration::from_millis(millis);
        }

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

        runtime.block_on(async move {
            let handle = tokio::runtime::Handle::current();
            let store: Arc<dyn HostStore> = store;
            let panel_join = tokio::task::spawn_blocking(move || {
                panel::run(panel_options, store, handle).map_err(|err| err.to_string())
            })
            .await;

            let panel_result = panel_join.map_err(|err| -> Box<dyn Error> { Box::new(err) })?;
            panel_result.map_err(|err| {
                Box::new(std::io::Error::new(std::io::ErrorKind::Other, err)) as Box<dyn Error>
            })?;
            Ok::<(), Box<dyn Error>>(())
        })?;

        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("proteus: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_options, CliOptions};

    #[test]
    fn parses_empty_args() {
        let options = parse_options(std::iter::empty()).expect("parse options");
        assert_eq!(options, CliOptions::default());
    }

    #[test]
    fn parses_demo_flag() {
        let options = parse_options(["--demo".to_owned()].into_iter()).expect("parse options");
        assert!(options.demo);
        assert!(options.context_file.is_none());
    }

    #[test]
    fn parses_positional_context_file() {
        let options =
            parse_options(["ctx.json".to_owned()].into_iter()).expect("parse options");
        assert_eq!(options.context_file.as_deref(), Some("ctx.json"));
        assert!(!options.demo);
    }

    #[test]
    fn parses_context_flag() {
        let options = parse_options(["--context".to_owned(), "ctx.json".to_owned()].into_iter())
            .expect("parse options");
        assert_eq!(options.context_file.as_deref(), Some("ctx.json"));
    }

    #[test]
    fn parses_key_and_prefs_dir() {
        let options = parse_options(
            [
                "--key".to_owned(),
                "my_context".to_owned(),
                "--prefs-dir".to_owned(),
                ".proteus".to_owned(),
            ]
            .into_iter(),
        )
        .expect("parse options");
        assert_eq!(options.key.as_deref(), Some("my_context"));
        assert_eq!(options.prefs_dir.as_deref(), Some(".proteus"));
    }

    #[test]
    fn parses_endpoint_overrides() {
        let options = parse_options(
            [
                "--local-base".to_owned(),
                "http://127.0.0.1:5173".to_owned(),
                "--cdn-base".to_owned(),
                "https://cdn.example".to_owned(),
            ]
            .into_iter(),
        )
        .expect("parse options");
        assert_eq!(options.local_base.as_deref(), Some("http://127.0.0.1:5173"));
        assert_eq!(options.cdn_base.as_deref(), Some("https://cdn.example"));
    }

    #[test]
    fn parses_debounce_and_screen() {
        let options = parse_options(
            ["--debounce-ms".to_owned(), "250".to_owned(), "--screen".to_owned(), "a:b".to_owned()]
                .into_iter(),
        )
        .expect("parse options");
        assert_eq!(options.debounce_ms, Some(250));
        assert_eq!(options.screen.as_deref(), Some("a:b"));
    }

    #[test]
    fn rejects_non_numeric_debounce() {
        parse_options(["--debounce-ms".to_owned(), "soon".to_owned()].into_iter()).unwrap_err();
    }

    #[test]
    fn rejects_demo_with_context_file() {
        parse_options(["--demo".to_owned(), "ctx.json".to_owned()].into_iter()).unwrap_err();
        parse_options(
            ["--context".to_owned(), "ctx.json".to_owned(), "--demo".to_owned()].into_iter(),
        )
        .unwrap_err();
    }

    #[test]
    fn rejects_multiple_context_files() {
        parse_options(["one.json".to_owned(), "two.json".to_owned()].into_iter()).unwrap_err();
        parse_options(
            ["--context".to_owned(), "one.json".to_owned(), "two.json".to_owned()].into_iter(),
        )
        .unwrap_err();
    }

    #[test]
    fn rejects_duplicate_flags() {
        parse_options(["--demo".to_owned(), "--demo".to_owned()].into_iter()).unwrap_err();
        parse_options(
            ["--key".to_owned(), "a".to_owned(), "--key".to_owned(), "b".to_owned()].into_iter(),
        )
        .unwrap_err();
    }

    #[test]
    fn rejects_unknown_args() {
        parse_options(["--nope".to_owned()].into_iter()).unwrap_err();
    }

    #[test]
    fn rejects_missing_flag_values() {
        parse_options(["--key".to_owned()].into_iter()).unwrap_err();
        parse_options(["--screen".to_owned()].into_iter()).unwrap_err();
    }
}
