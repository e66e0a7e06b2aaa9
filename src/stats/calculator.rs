//! Statistics Calculator Module
//! Aggregations behind the dashboard views: overview totals, per-department
//! summaries, box-plot statistics, correlations, t-test, rankings.

use polars::prelude::*;
use rayon::prelude::*;
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::data::Department;

/// Significance threshold for the ECE vs CSE t-test annotation.
pub const SIGNIFICANCE_THRESHOLD: f64 = 0.05;

/// Headline numbers for the Overview view.
#[derive(Debug, Clone, Copy)]
pub struct Overview {
    pub faculty_count: usize,
    pub total_publications: f64,
    pub total_citations: f64,
    pub mean_h_index: f64,
}

/// Five-number summary plus mean, for box plots.
#[derive(Debug, Clone, Copy)]
pub struct BoxStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub q1: f64,
    pub q3: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
}

/// Welch's t-test result between two departments.
#[derive(Debug, Clone, Copy)]
pub struct TTest {
    pub t: f64,
    pub p_value: f64,
}

impl TTest {
    pub fn is_significant(&self) -> bool {
        self.p_value <= SIGNIFICANCE_THRESHOLD
    }
}

/// Handles statistical calculations over the clean canonical table.
pub struct StatsCalculator;

impl StatsCalculator {
    pub fn overview(df: &DataFrame) -> PolarsResult<Overview> {
        let total_publications = Self::column_sum(df, "Total Publications")?;
        let total_citations = Self::column_sum(df, "Citations")?;
        let h = Self::metric_values(df, "H Index", None)?;
        let mean_h_index = if h.is_empty() {
            0.0
        } else {
            h.iter().sum::<f64>() / h.len() as f64
        };

        Ok(Overview {
            faculty_count: df.height(),
            total_publications,
            total_citations,
            mean_h_index,
        })
    }

    fn column_sum(df: &DataFrame, column: &str) -> PolarsResult<f64> {
        Ok(df
            .column(column)?
            .cast(&DataType::Float64)?
            .f64()?
            .sum()
            .unwrap_or(0.0))
    }

    /// Rows per department, in fixed department order.
    pub fn department_counts(df: &DataFrame) -> PolarsResult<Vec<(Department, usize)>> {
        Department::ALL
            .iter()
            .map(|&dept| Ok((dept, Self::filter_department(df, dept)?.height())))
            .collect()
    }

    /// Metric values, optionally restricted to one department.
    pub fn metric_values(
        df: &DataFrame,
        metric: &str,
        department: Option<Department>,
    ) -> PolarsResult<Vec<f64>> {
        let scoped;
        let df = match department {
            Some(dept) => {
                scoped = Self::filter_department(df, dept)?;
                &scoped
            }
            None => df,
        };

        let values = df.column(metric)?.cast(&DataType::Float64)?;
        Ok(values.f64()?.into_iter().flatten().collect())
    }

    pub fn filter_department(df: &DataFrame, department: Department) -> PolarsResult<DataFrame> {
        df.clone()
            .lazy()
            .filter(col("Department").eq(lit(department.as_str())))
            .collect()
    }

    /// Per-department sum of a metric, in fixed department order.
    pub fn department_sums(df: &DataFrame, metric: &str) -> PolarsResult<Vec<(Department, f64)>> {
        Department::ALL
            .iter()
            .map(|&dept| {
                let values = Self::metric_values(df, metric, Some(dept))?;
                Ok((dept, values.iter().sum()))
            })
            .collect()
    }

    /// Per-department mean of a metric, in fixed department order.
    pub fn department_means(df: &DataFrame, metric: &str) -> PolarsResult<Vec<(Department, f64)>> {
        Department::ALL
            .iter()
            .map(|&dept| {
                let values = Self::metric_values(df, metric, Some(dept))?;
                let mean = if values.is_empty() {
                    0.0
                } else {
                    values.iter().sum::<f64>() / values.len() as f64
                };
                Ok((dept, mean))
            })
            .collect()
    }

    /// Box-plot summary with 1.5 IQR whiskers clamped to observed values.
    pub fn box_stats(values: &[f64]) -> Option<BoxStats> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let q1 = Self::percentile(&sorted, 25.0);
        let median = Self::percentile(&sorted, 50.0);
        let q3 = Self::percentile(&sorted, 75.0);
        let iqr = q3 - q1;

        let whisker_low = sorted
            .iter()
            .copied()
            .find(|&v| v >= q1 - 1.5 * iqr)
            .unwrap_or(q1);
        let whisker_high = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= q3 + 1.5 * iqr)
            .unwrap_or(q3);

        Some(BoxStats {
            count: sorted.len(),
            mean,
            median,
            q1,
            q3,
            whisker_low,
            whisker_high,
        })
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Pearson correlation coefficient; NaN when undefined (fewer than two
    /// points or zero variance).
    pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
        let n = x.len().min(y.len());
        if n < 2 {
            return f64::NAN;
        }

        let mx = x[..n].iter().sum::<f64>() / n as f64;
        let my = y[..n].iter().sum::<f64>() / n as f64;

        let mut cov = 0.0;
        let mut vx = 0.0;
        let mut vy = 0.0;
        for i in 0..n {
            let dx = x[i] - mx;
            let dy = y[i] - my;
            cov += dx * dy;
            vx += dx * dx;
            vy += dy * dy;
        }

        if vx == 0.0 || vy == 0.0 {
            return f64::NAN;
        }
        cov / (vx.sqrt() * vy.sqrt())
    }

    /// Pairwise Pearson matrix over the given metric columns, row-parallel.
    pub fn correlation_matrix(df: &DataFrame, metrics: &[&str]) -> PolarsResult<Vec<Vec<f64>>> {
        let series: Vec<Vec<f64>> = metrics
            .iter()
            .map(|m| Self::metric_values(df, m, None))
            .collect::<PolarsResult<_>>()?;

        Ok(series
            .par_iter()
            .map(|row_values| {
                series
                    .iter()
                    .map(|col_values| Self::pearson(row_values, col_values))
                    .collect()
            })
            .collect())
    }

    /// Perform Welch's t-test (independent samples, unequal variance).
    pub fn welch_ttest(a: &[f64], b: &[f64]) -> Option<TTest> {
        let n1 = a.len() as f64;
        let n2 = b.len() as f64;
        if n1 < 2.0 || n2 < 2.0 {
            return None;
        }

        let mean1 = a.iter().sum::<f64>() / n1;
        let mean2 = b.iter().sum::<f64>() / n2;

        let var1 = a.iter().map(|x| (x - mean1).powi(2)).sum::<f64>() / (n1 - 1.0);
        let var2 = b.iter().map(|x| (x - mean2).powi(2)).sum::<f64>() / (n2 - 1.0);

        let se = (var1 / n1 + var2 / n2).sqrt();
        if se == 0.0 {
            return Some(TTest { t: 0.0, p_value: 1.0 });
        }

        let t = (mean1 - mean2) / se;

        // Welch-Satterthwaite degrees of freedom
        let df_num = (var1 / n1 + var2 / n2).powi(2);
        let df_denom = (var1 / n1).powi(2) / (n1 - 1.0) + (var2 / n2).powi(2) / (n2 - 1.0);
        let dof = df_num / df_denom;

        let dist = StudentsT::new(0.0, 1.0, dof).ok()?;
        let p_value = 2.0 * (1.0 - dist.cdf(t.abs()));
        Some(TTest { t, p_value })
    }

    /// Top-N rows by a metric, optionally filtered to one department.
    pub fn rank_top_n(
        df: &DataFrame,
        metric: &str,
        department: Option<Department>,
        n: usize,
    ) -> PolarsResult<DataFrame> {
        let scoped = match department {
            Some(dept) => Self::filter_department(df, dept)?,
            None => df.clone(),
        };

        let sorted = scoped.sort(
            [metric],
            SortMultipleOptions::default().with_order_descending(true),
        )?;
        Ok(sorted.head(Some(n)))
    }

    /// Stringified cell values of one column, quote-trimmed.
    pub fn string_values(df: &DataFrame, column: &str) -> PolarsResult<Vec<String>> {
        let col = df.column(column)?;
        (0..df.height())
            .map(|i| {
                Ok(col
                    .get(i)?
                    .to_string()
                    .trim_matches('"')
                    .to_string())
            })
            .collect()
    }

    /// Sorted unique professor names within one department.
    pub fn professors_of_department(
        df: &DataFrame,
        department: Department,
    ) -> PolarsResult<Vec<String>> {
        let scoped = Self::filter_department(df, department)?;
        let mut names = Self::string_values(&scoped, "Name")?;
        names.sort();
        names.dedup();
        Ok(names)
    }

    /// One professor's row (first match wins for duplicate names).
    pub fn professor_row(df: &DataFrame, name: &str) -> PolarsResult<Option<DataFrame>> {
        let matched = df
            .clone()
            .lazy()
            .filter(col("Name").eq(lit(name)))
            .collect()?;
        if matched.height() == 0 {
            Ok(None)
        } else {
            Ok(Some(matched.head(Some(1))))
        }
    }

    /// Numeric cell from a single-row frame.
    pub fn row_metric(row: &DataFrame, column: &str) -> PolarsResult<f64> {
        Ok(row.column(column)?.get(0)?.try_extract::<f64>().unwrap_or(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_df() -> DataFrame {
        DataFrame::new(vec![
            Column::new("Name".into(), vec!["A", "B", "C", "D"]),
            Column::new(
                "Designation".into(),
                vec!["Professor", "Professor", "Professor", "Professor"],
            ),
            Column::new("Journal Publications".into(), vec![5.0, 2.0, 9.0, 4.0]),
            Column::new("Conference Publications".into(), vec![3.0, 4.0, 1.0, 2.0]),
            Column::new("Total Publications".into(), vec![8.0, 6.0, 10.0, 6.0]),
            Column::new("Books/Chapters".into(), vec![1.0, 0.0, 2.0, 0.0]),
            Column::new("Patents".into(), vec![2.0, 0.0, 1.0, 0.0]),
            Column::new("Projects".into(), vec![1.0, 1.0, 3.0, 2.0]),
            Column::new("Citations".into(), vec![40.0, 11.0, 90.0, 25.0]),
            Column::new("H Index".into(), vec![12.0, 3.0, 15.0, 6.0]),
            Column::new("Department".into(), vec!["ECE", "ECE", "CSE", "CSE"]),
        ])
        .unwrap()
    }

    #[test]
    fn overview_totals_match_hand_computation() {
        let ov = StatsCalculator::overview(&sample_df()).unwrap();
        assert_eq!(ov.faculty_count, 4);
        assert_eq!(ov.total_publications, 30.0);
        assert_eq!(ov.total_citations, 166.0);
        assert!((ov.mean_h_index - 9.0).abs() < 1e-12);
    }

    #[test]
    fn department_aggregates_respect_the_tag() {
        let df = sample_df();
        let sums = StatsCalculator::department_sums(&df, "Journal Publications").unwrap();
        assert_eq!(sums, vec![(Department::Ece, 7.0), (Department::Cse, 13.0)]);

        let means = StatsCalculator::department_means(&df, "Citations").unwrap();
        assert_eq!(means[0], (Department::Ece, 25.5));
        assert_eq!(means[1], (Department::Cse, 57.5));
    }

    #[test]
    fn percentile_interpolates_linearly() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(StatsCalculator::percentile(&sorted, 0.0), 1.0);
        assert_eq!(StatsCalculator::percentile(&sorted, 50.0), 2.5);
        assert_eq!(StatsCalculator::percentile(&sorted, 100.0), 4.0);
        assert_eq!(StatsCalculator::percentile(&sorted, 25.0), 1.75);
    }

    #[test]
    fn box_stats_five_number_summary() {
        let stats = StatsCalculator::box_stats(&[1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();
        assert_eq!(stats.count, 5);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.q1, 2.0);
        assert_eq!(stats.q3, 4.0);
        // 100 is beyond q3 + 1.5*IQR, so the whisker stops at 4.
        assert_eq!(stats.whisker_high, 4.0);
        assert_eq!(stats.whisker_low, 1.0);
        assert!(StatsCalculator::box_stats(&[]).is_none());
    }

    #[test]
    fn pearson_detects_perfect_correlation() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 4.0, 6.0, 8.0];
        assert!((StatsCalculator::pearson(&x, &y) - 1.0).abs() < 1e-12);

        let inv = [8.0, 6.0, 4.0, 2.0];
        assert!((StatsCalculator::pearson(&x, &inv) + 1.0).abs() < 1e-12);

        let flat = [5.0, 5.0, 5.0, 5.0];
        assert!(StatsCalculator::pearson(&x, &flat).is_nan());
    }

    #[test]
    fn correlation_matrix_is_symmetric_with_unit_diagonal() {
        let df = sample_df();
        let metrics = ["Journal Publications", "Citations", "H Index"];
        let matrix = StatsCalculator::correlation_matrix(&df, &metrics).unwrap();

        for i in 0..metrics.len() {
            assert!((matrix[i][i] - 1.0).abs() < 1e-12);
            for j in 0..metrics.len() {
                assert!((matrix[i][j] - matrix[j][i]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn welch_ttest_flags_separated_samples() {
        let a = [10.0, 11.0, 10.5, 9.5, 10.2];
        let b = [1.0, 1.2, 0.8, 1.1, 0.9];
        let test = StatsCalculator::welch_ttest(&a, &b).unwrap();
        assert!(test.p_value < 0.01);
        assert!(test.is_significant());

        // Tiny samples are not testable.
        assert!(StatsCalculator::welch_ttest(&[1.0], &b).is_none());
    }

    #[test]
    fn rankings_sort_descending_and_truncate() {
        let df = sample_df();
        let top = StatsCalculator::rank_top_n(&df, "Citations", None, 2).unwrap();
        assert_eq!(top.height(), 2);
        let names = StatsCalculator::string_values(&top, "Name").unwrap();
        assert_eq!(names, vec!["C", "A"]);

        let ece_only =
            StatsCalculator::rank_top_n(&df, "Citations", Some(Department::Ece), 10).unwrap();
        assert_eq!(ece_only.height(), 2);
        let names = StatsCalculator::string_values(&ece_only, "Name").unwrap();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn professor_lookup_takes_first_match() {
        let df = sample_df();
        let row = StatsCalculator::professor_row(&df, "C").unwrap().unwrap();
        assert_eq!(row.height(), 1);
        assert_eq!(
            StatsCalculator::row_metric(&row, "H Index").unwrap(),
            15.0
        );
        assert!(StatsCalculator::professor_row(&df, "Nobody")
            .unwrap()
            .is_none());
    }

    #[test]
    fn professors_listed_sorted_per_department() {
        let df = sample_df();
        let profs =
            StatsCalculator::professors_of_department(&df, Department::Cse).unwrap();
        assert_eq!(profs, vec!["C", "D"]);
    }
}
