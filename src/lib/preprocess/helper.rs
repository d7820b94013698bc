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

use crate::typedef::MinMax;

pub(crate) fn normalize_column(values: &[f64], range: &MinMax) -> Vec<f64> {
	values.iter().map(|each| range.normalize(*each)).collect()
}

/// Flattens two equally long columns into `a0, b0, a1, b1, ...`.
pub(crate) fn interleave<'a>(
	first: impl IntoIterator<Item = &'a f64>,
	second: impl IntoIterator<Item = &'a f64>,
) -> Vec<f64> {
	first
		.into_iter()
		.zip(second)
		.flat_map(|(a, b)| [*a, *b])
		.collect()
}

/// Every `(values[i - lookback..i], i)` for `i` in `lookback..values.len()`.
pub(super) fn slide(values: &[f64], lookback: usize) -> impl Iterator<Item = (&[f64], usize)> {
	(lookback..values.len()).map(move |index| (&values[index - lookback..index], index))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn interleave_alternates_columns() {
		let closes = [1f64, 2f64, 3f64];
		let volumes = [10f64, 20f64, 30f64];
		assert_eq!(
			interleave(&closes, &volumes),
			vec![1f64, 10f64, 2f64, 20f64, 3f64, 30f64]
		);
	}

	#[test]
	fn slide_yields_one_window_per_label() {
		let values = [1f64, 2f64, 3f64, 4f64];
		let windows = slide(&values, 2).collect::<Vec<_>>();
		assert_eq!(windows.len(), 2);
		assert_eq!(windows[0], (&values[0..2], 2));
		assert_eq!(windows[1], (&values[1..3], 3));
		assert_eq!(slide(&values, 4).count(), 0);
		assert_eq!(slide(&values, 9).count(), 0);
	}
}
