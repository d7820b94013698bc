/*
 * Project::Augur, a synthetic market forecaster with an image caption client
 * Copyright (C) 2025 Athaariq A. Ramadhani <foss@athaariq.my.id>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <http://www.gnu.org/licenses/>.
 */

use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::{Parser, Subcommand};
use project_augur_lib::{
	available_symbols,
	forecast::command::{get_evaluation, get_prediction, start_train},
	generate_seeded_series, generate_series, CaptionClient, CaptionConfig, CaptionStyle,
	EpochProgress, Forecaster, ImageUpload, LinearForecaster, ModelKind, NeuralForecaster,
	SessionStats, TrainingConfig, DEFAULT_STEPS,
};
use tokio::sync::mpsc;
use tracing::info;

#[derive(Parser)]
#[command(name = "augur")]
#[command(about = "Forecast synthetic stock prices and caption images")]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// List the demo symbols
	Symbols,
	/// Generate a synthetic series, train a model on it and forecast
	Forecast {
		/// Ticker to synthesize; unknown tickers start at 100
		#[arg(short, long, default_value = "AAPL")]
		symbol: String,

		/// Calendar days of history
		#[arg(short, long, default_value_t = 365)]
		days: usize,

		/// `linear` or `neural`
		#[arg(short, long, default_value = "linear")]
		model: ModelKind,

		/// Days to forecast past the last bar
		#[arg(long, default_value_t = DEFAULT_STEPS)]
		steps: usize,

		/// Override the epoch count of the chosen model
		#[arg(long)]
		epochs: Option<usize>,

		/// Make generation and training reproducible
		#[arg(long)]
		seed: Option<u64>,
	},
	/// Caption an image with the inference server
	Caption {
		#[arg(value_name = "PATH")]
		image: PathBuf,

		/// Ask for a single caption in this style instead of one per model
		#[arg(long)]
		style: Option<CaptionStyle>,

		/// Server address, overrides AUGUR_CAPTION_URL
		#[arg(long)]
		url: Option<String>,
	},
	/// Show whether the inference server is up
	Status {
		/// Server address, overrides AUGUR_CAPTION_URL
		#[arg(long)]
		url: Option<String>,
	},
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	tracing_subscriber::fmt()
		.with_env_filter(
			tracing_subscriber::EnvFilter::from_default_env()
				.add_directive(tracing::Level::INFO.into()),
		)
		.init();

	let cli = Cli::parse();

	match cli.command {
		Commands::Symbols => {
			for each in available_symbols() {
				println!("{:<6} {}", each.symbol, each.name);
			}
		}
		Commands::Forecast {
			symbol,
			days,
			model,
			steps,
			epochs,
			seed,
		} => run_forecast(symbol, days, model, steps, epochs, seed).await?,
		Commands::Caption { image, style, url } => {
			let client = CaptionClient::new(caption_config(url))?;
			let upload = ImageUpload::from_path(&image).await?;

			let stats = match style {
				Some(style) => {
					let caption = client.generate_single_caption(&upload, style).await?;
					println!("{}", serde_json::to_string_pretty(&caption)?);
					SessionStats::default().record_single(&caption)
				}
				None => {
					let batch = client.generate_captions(&upload).await?;
					println!("{}", serde_json::to_string_pretty(&batch)?);
					SessionStats::default().record_batch(&batch)
				}
			};

			info!(
				captions = stats.total_captions,
				confidence = stats.average_confidence,
				"captioning finished"
			);
		}
		Commands::Status { url } => {
			let client = CaptionClient::new(caption_config(url))?;
			let status = client.check_status().await;
			println!("{}", serde_json::to_string_pretty(&status)?);
		}
	}

	Ok(())
}

fn caption_config(url: Option<String>) -> CaptionConfig {
	let config = CaptionConfig::from_env();
	match url {
		Some(url) => config.with_base_url(url),
		None => config,
	}
}

async fn run_forecast(
	symbol: String,
	days: usize,
	model: ModelKind,
	steps: usize,
	epochs: Option<usize>,
	seed: Option<u64>,
) -> anyhow::Result<()> {
	let series = match seed {
		Some(seed) => generate_seeded_series(&symbol, days, seed),
		None => generate_series(&symbol, days),
	};
	info!(symbol = %series.symbol, bars = series.bars.len(), "series generated");

	let forecaster = build_forecaster(model, epochs, seed);
	let bars: Arc<[_]> = series.bars.into();

	let (sender, mut receiver) = mpsc::unbounded_channel::<EpochProgress>();
	let reporter = tokio::spawn(async move {
		let mut reported = 0;
		while let Some(progress) = receiver.recv().await {
			// Every 10 percent is plenty on a terminal.
			let decile = (progress.percent / 10f32) as u32;
			if decile > reported || progress.epoch == progress.epochs {
				reported = decile;
				info!(
					epoch = progress.epoch,
					percent = progress.percent,
					train_loss = progress.train_loss,
					valid_loss = ?progress.valid_loss,
					"training"
				);
			}
		}
	});

	let summary = start_train(forecaster.clone(), bars.clone(), sender)
		.await
		.with_context(|| format!("training {model} model on {symbol}"))?;
	reporter.await?;
	println!("{}", serde_json::to_string_pretty(&summary)?);

	let predictions = get_prediction(forecaster.clone(), bars.clone(), steps).await?;
	println!("{}", serde_json::to_string_pretty(&predictions)?);

	let metrics = get_evaluation(forecaster, bars).await?;
	println!("{}", serde_json::to_string_pretty(&metrics)?);

	Ok(())
}

fn build_forecaster(
	model: ModelKind,
	epochs: Option<usize>,
	seed: Option<u64>,
) -> Arc<dyn Forecaster> {
	let config = match model {
		ModelKind::Linear => TrainingConfig::linear(),
		ModelKind::Neural => TrainingConfig::neural(),
	};
	let config = match epochs {
		Some(epochs) => config.with_epochs(epochs),
		None => config,
	};

	match model {
		ModelKind::Linear => {
			let forecaster = LinearForecaster::with_config(config);
			Arc::new(match seed {
				Some(seed) => forecaster.with_seed(seed),
				None => forecaster,
			})
		}
		ModelKind::Neural => {
			let forecaster = NeuralForecaster::with_config(config);
			Arc::new(match seed {
				Some(seed) => forecaster.with_seed(seed),
				None => forecaster,
			})
		}
	}
}
