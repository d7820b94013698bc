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

use serde::Serialize;

#[derive(Serialize, Clone, Copy, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SymbolInfo {
	pub symbol: &'static str,
	pub name: &'static str,
	#[serde(skip)]
	pub base_price: f64,
}

/// Base price for any symbol missing from [`DEMO_SYMBOLS`].
pub const DEFAULT_BASE_PRICE: f64 = 100f64;

pub const DEMO_SYMBOLS: [SymbolInfo; 8] = [
	SymbolInfo {
		symbol: "AAPL",
		name: "Apple Inc.",
		base_price: 180f64,
	},
	SymbolInfo {
		symbol: "GOOGL",
		name: "Alphabet Inc.",
		base_price: 140f64,
	},
	SymbolInfo {
		symbol: "MSFT",
		name: "Microsoft Corporation",
		base_price: 380f64,
	},
	SymbolInfo {
		symbol: "TSLA",
		name: "Tesla, Inc.",
		base_price: 250f64,
	},
	SymbolInfo {
		symbol: "AMZN",
		name: "Amazon.com, Inc.",
		base_price: 145f64,
	},
	SymbolInfo {
		symbol: "NVDA",
		name: "NVIDIA Corporation",
		base_price: 480f64,
	},
	SymbolInfo {
		symbol: "META",
		name: "Meta Platforms, Inc.",
		base_price: 320f64,
	},
	SymbolInfo {
		symbol: "NFLX",
		name: "Netflix, Inc.",
		base_price: 400f64,
	},
];

/// Random walk state carried from one simulated day to the next.
pub(super) struct WalkState {
	pub base_price: f64,
	pub drift: f64,
}
