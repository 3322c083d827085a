use anyhow::{Context, Result};
use campus_trees::cli::{Cli, Commands, WatchCommand};
use campus_trees::config::Config;
use campus_trees::filter::{MapSurface, MapView, MemoryLayer, ViewFilter};
use campus_trees::store::RecordStore;
use campus_trees::{export, loader};
use clap::Parser;
use std::cell::RefCell;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

type MapFilter = ViewFilter<MapView, MemoryLayer>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load().context("設定の読み込みに失敗")?;

    match cli.command {
        Commands::Show { input, search, category, zoom, format, output } => {
            let mut filter = open_filter(&input, &config, zoom)?;
            filter.set_category(category);
            filter.set_search_text(&search);

            let trees = export::visible_trees(&filter);
            match output {
                Some(path) => {
                    export::export_visible(&trees, format, &path)
                        .with_context(|| format!("write {}", path.display()))?;
                    println!("✔ {}本を出力: {}", trees.len(), path.display());
                }
                None => print!("{}", export::render(&trees, format)?),
            }
        }

        Commands::Stats { input } => {
            let records = loader::read_inventory(&input)
                .with_context(|| format!("read {}", input.display()))?;
            let mut store = RecordStore::new(config.default_image.clone());
            let summary = store.append(records);

            println!("🌳 {}", input.display());
            println!("  読み込み: {}本 (スキップ: {}行)", summary.loaded, summary.skipped);
            for (category, count) in store.category_counts() {
                println!("  {:<9} {:>5}", category, count);
            }
        }

        Commands::Watch { input, zoom } => {
            let filter = RefCell::new(open_filter(&input, &config, zoom)?);
            print_summary(&filter.borrow());
            watch(&filter, &config).await?;
        }

        Commands::Config { set_threshold, set_debounce_ms, show } => {
            let mut config = config;
            let changed = set_threshold.is_some() || set_debounce_ms.is_some();

            if let Some(threshold) = set_threshold {
                config.zoom_threshold = threshold;
            }
            if let Some(ms) = set_debounce_ms {
                config.debounce_ms = ms;
            }
            if changed {
                config.save().context("設定の保存に失敗")?;
                println!("✔ 設定を保存しました");
            }

            if show || !changed {
                println!("設定:");
                println!("  ズーム閾値: {}", config.zoom_threshold);
                println!("  ズーム範囲: {} - {}", config.min_zoom, config.max_zoom);
                println!("  初期ズーム: {}", config.initial_zoom);
                println!("  デバウンス: {}ms", config.debounce_ms);
                println!("  既定画像: {}", config.default_image);
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_filter(input: &Path, config: &Config, zoom: Option<f64>) -> Result<MapFilter> {
    let records =
        loader::read_inventory(input).with_context(|| format!("read {}", input.display()))?;

    let map = MapView::new(
        zoom.unwrap_or(config.initial_zoom),
        config.min_zoom,
        config.max_zoom,
    );
    let mut filter = ViewFilter::new(
        RecordStore::new(config.default_image.clone()),
        map,
        MemoryLayer::default(),
    )
    .with_zoom_threshold(config.zoom_threshold);

    let summary = filter.load(records);
    if summary.skipped > 0 {
        eprintln!("警告: 座標が不正な{}行をスキップしました", summary.skipped);
    }
    Ok(filter)
}

fn print_summary(filter: &MapFilter) {
    let state = filter.state();
    let representation = filter.representation_for(filter.map().zoom());
    println!(
        "[zoom {} / {:?}] search=\"{}\" category={} → {}/{}本",
        filter.map().zoom(),
        representation,
        state.search_text(),
        state.selected_category(),
        filter.visible().len(),
        filter.store().len()
    );
}

/// 標準入力の各行を処理する。検索語だけがデバウンスを通る
async fn watch(filter: &RefCell<MapFilter>, config: &Config) -> Result<()> {
    let (search_tx, search_rx) = mpsc::channel::<String>(64);

    let reader = async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            match WatchCommand::parse(&line) {
                Ok(WatchCommand::Search(text)) => {
                    if search_tx.send(text).await.is_err() {
                        break;
                    }
                }
                Ok(WatchCommand::Zoom(zoom)) => {
                    let mut filter = filter.borrow_mut();
                    filter.map_mut().set_zoom(zoom);
                    filter.zoom_changed();
                    print_summary(&filter);
                }
                Ok(WatchCommand::Category(category)) => {
                    let mut filter = filter.borrow_mut();
                    filter.set_category(category);
                    print_summary(&filter);
                }
                Err(message) => eprintln!("{}", message),
            }
        }
        Ok::<_, std::io::Error>(())
    };

    let debounced = campus_trees::debounce::run_debounced(
        search_rx,
        config.debounce_window(),
        |text: String| {
            let mut filter = filter.borrow_mut();
            filter.set_search_text(&text);
            print_summary(&filter);
        },
    );

    let (read_result, ()) = tokio::join!(reader, debounced);
    read_result.context("標準入力の読み込みに失敗")?;
    Ok(())
}
