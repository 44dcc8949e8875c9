// Parameter grid expansion
// Cartesian product over swept effect parameters, first parameter slowest

use crate::render::EffectParams;

/// `n` evenly spaced values over `[start, stop]`; a single point yields `start`
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            let mut values: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            values[n - 1] = stop;
            values
        }
    }
}

/// Ordered (name, candidate values) axes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterGrid {
    axes: Vec<(String, Vec<f64>)>,
}

impl ParameterGrid {
    pub fn new<I, S>(axes: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<f64>)>,
        S: Into<String>,
    {
        ParameterGrid {
            axes: axes.into_iter().map(|(name, values)| (name.into(), values)).collect(),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.axes.iter().map(|(name, _)| name.as_str())
    }

    /// Number of combinations; no axes means one (empty) combination
    pub fn len(&self) -> usize {
        self.axes.iter().map(|(_, values)| values.len()).product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fresh pass over every combination
    pub fn iter(&self) -> GridIter<'_> {
        GridIter {
            axes: &self.axes,
            cursor: vec![0; self.axes.len()],
            remaining: self.len(),
        }
    }
}

impl<'a> IntoIterator for &'a ParameterGrid {
    type Item = EffectParams;
    type IntoIter = GridIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Odometer over the axes; the last axis turns fastest
pub struct GridIter<'a> {
    axes: &'a [(String, Vec<f64>)],
    cursor: Vec<usize>,
    remaining: usize,
}

impl Iterator for GridIter<'_> {
    type Item = EffectParams;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let params = self
            .axes
            .iter()
            .zip(&self.cursor)
            .map(|((name, values), &i)| (name.clone(), values[i]))
            .collect();

        self.remaining -= 1;
        for axis in (0..self.axes.len()).rev() {
            self.cursor[axis] += 1;
            if self.cursor[axis] < self.axes[axis].1.len() {
                break;
            }
            self.cursor[axis] = 0;
        }

        Some(params)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for GridIter<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn values(params: &EffectParams) -> Vec<f64> {
        params.iter().map(|(_, v)| v).collect()
    }

    #[test]
    fn test_linspace() {
        assert_eq!(linspace(10.0, 50.0, 1), vec![10.0]);
        assert_eq!(linspace(10.0, 50.0, 5), vec![10.0, 20.0, 30.0, 40.0, 50.0]);
        assert_eq!(linspace(0.1, 1.0, 2), vec![0.1, 1.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_no_parameters_yields_one_empty_combination() {
        let grid = ParameterGrid::default();
        let combos: Vec<_> = grid.iter().collect();

        assert_eq!(grid.len(), 1);
        assert_eq!(combos.len(), 1);
        assert!(combos[0].is_empty());
    }

    #[test]
    fn test_empty_axis_yields_nothing() {
        let grid = ParameterGrid::new(vec![("a", vec![1.0, 2.0]), ("b", vec![])]);
        assert_eq!(grid.len(), 0);
        assert!(grid.is_empty());
        assert_eq!(grid.iter().count(), 0);
    }

    #[test]
    fn test_first_parameter_varies_slowest() {
        let grid = ParameterGrid::new(vec![("a", vec![1.0, 2.0]), ("b", vec![10.0, 20.0, 30.0])]);
        let combos: Vec<Vec<f64>> = grid.iter().map(|p| values(&p)).collect();

        assert_eq!(
            combos,
            vec![
                vec![1.0, 10.0],
                vec![1.0, 20.0],
                vec![1.0, 30.0],
                vec![2.0, 10.0],
                vec![2.0, 20.0],
                vec![2.0, 30.0],
            ]
        );
    }

    #[test]
    fn test_product_count_and_distinct() {
        let grid = ParameterGrid::new(vec![
            ("a", vec![1.0, 2.0, 3.0]),
            ("b", vec![4.0, 5.0]),
            ("c", vec![6.0, 7.0, 8.0, 9.0]),
        ]);
        let combos: Vec<_> = grid.iter().collect();
        assert_eq!(combos.len(), 24);
        assert_eq!(grid.iter().len(), 24);

        let distinct: HashSet<Vec<u64>> = combos
            .iter()
            .map(|p| p.iter().map(|(_, v)| v.to_bits()).collect())
            .collect();
        assert_eq!(distinct.len(), 24);

        for combo in &combos {
            assert_eq!(combo.names().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        }
    }

    #[test]
    fn test_restartable() {
        let grid = ParameterGrid::new(vec![("room_size", vec![0.1, 0.5])]);
        let first: Vec<_> = grid.iter().collect();
        let second: Vec<_> = (&grid).into_iter().collect();
        assert_eq!(first, second);
    }
}
