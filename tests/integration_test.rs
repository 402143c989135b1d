//! Integration tests for the signal and backtest pipeline.
//!
//! Tests cover:
//! - Full backtest pipeline with mock data port
//! - Crossing matrix behaviour on trend-only data
//! - Intersection prediction against a reloaded CSV history
//! - CSV load, signal table build, and CSV write through the real adapters

mod common;

use approx::assert_relative_eq;
use common::*;
use macross::adapters::csv_adapter::CsvPriceAdapter;
use macross::adapters::csv_report_adapter::CsvSignalWriter;
use macross::cli::run_backtest_pipeline;
use macross::domain::backtest::BacktestConfig;
use macross::domain::batch::{compute_crossing_matrix, compute_up_down, WindowPair};
use macross::domain::crossing::{crossing_indices, detect};
use macross::domain::error::MacrossError;
use macross::domain::indicator::sma::calculate_sma;
use macross::domain::intersection::{difference, predict};
use macross::domain::signal::Signal;
use macross::domain::signal_table::SignalTable;
use macross::domain::simulator::{simulate, SignalRow};
use macross::ports::data_port::PriceDataPort;
use macross::ports::report_port::SignalReportPort;

mod full_backtest_pipeline {
    use super::*;

    fn config() -> BacktestConfig {
        BacktestConfig {
            start_date: None,
            initial_capital: 1000.0,
            fast_window: 2,
            slow_window: 5,
        }
    }

    #[test]
    fn golden_cross_buy_and_final_liquidation() {
        let port = MockDataPort::new().with_series("TSLA", series_from("2020-01-01", &v_shape(10, 10)));
        let result = run_backtest_pipeline(&port, "TSLA", &config()).unwrap();

        assert_eq!(result.pair, WindowPair::new(2, 5).unwrap());
        assert_eq!(result.report.trades.len(), 2);

        let buy = &result.report.trades[0];
        assert_eq!(buy.action, Signal::Buy);
        assert_eq!(buy.date, date(2020, 1, 12));
        assert_eq!(buy.volume, 10);

        let sell = &result.report.trades[1];
        assert_eq!(sell.action, Signal::Sell);
        assert_eq!(sell.date, date(2020, 1, 20));
        assert_relative_eq!(result.report.final_cash, 60.0 + 10.0 * 118.0);
        assert_relative_eq!(result.report.gain, 240.0);
        assert_relative_eq!(result.report.gain_percent, 0.24, max_relative = 1e-12);
    }

    #[test]
    fn fetch_error_is_propagated() {
        let port = MockDataPort::new().with_error("NKLA", "delisted");
        match run_backtest_pipeline(&port, "NKLA", &config()) {
            Err(MacrossError::Data { reason }) => assert_eq!(reason, "delisted"),
            other => panic!("expected Data error, got {:?}", other),
        }
    }

    #[test]
    fn too_short_history_never_trades() {
        let port = MockDataPort::new().with_series("ARKK", series_from("2020-01-01", &[10.0, 11.0, 9.0]));
        let result = run_backtest_pipeline(&port, "ARKK", &config()).unwrap();
        assert!(result.report.trades.is_empty());
        assert_relative_eq!(result.report.gain, 0.0);
    }

    #[test]
    fn start_after_history_is_empty_run() {
        let mut cfg = config();
        cfg.start_date = Some(date(2021, 1, 1));
        let port = MockDataPort::new().with_series("QQQ", series_from("2020-01-01", &v_shape(10, 10)));
        let result = run_backtest_pipeline(&port, "QQQ", &cfg).unwrap();
        assert!(result.rows.is_empty());
        assert_relative_eq!(result.report.final_cash, 1000.0);
    }
}

mod simulator_scenarios {
    use super::*;

    #[test]
    fn buy_at_ten_sell_at_eight() {
        let series = series_from("2020-05-01", &[10.0, 10.0, 10.0, 12.0, 8.0]);
        let signals = ["-", "-", "buy", "-", "sell"];
        let rows: Vec<SignalRow> = series
            .bars()
            .iter()
            .zip(signals)
            .map(|(bar, s)| SignalRow {
                date: bar.date,
                close: bar.close,
                signal: s.parse().unwrap(),
            })
            .collect();

        let report = simulate(&rows, 100.0).unwrap();
        assert_relative_eq!(report.gain, -20.0);
        assert_relative_eq!(report.gain_percent, -0.2, max_relative = 1e-12);
    }
}

mod crossing_properties {
    use super::*;

    #[test]
    fn rising_prices_never_cross() {
        let closes: Vec<f64> = (0..60).map(|i| 20.0 + 0.75 * i as f64).collect();
        let series = series_from("2020-01-01", &closes);
        let matrix = compute_crossing_matrix(&series, &[3, 5, 10]).unwrap();
        assert_eq!(matrix.len(), 3);
        for (_, signal) in matrix.iter() {
            assert!(signal.iter().all(|s| *s == 0));
        }
        assert!(matrix.latest().values().all(|s| *s == 0));
    }

    #[test]
    fn swapped_inputs_flip_direction() {
        let series = series_from("2020-01-01", &v_shape(12, 12));
        let ma3 = calculate_sma(&series, 3).unwrap();
        let ma7 = calculate_sma(&series, 7).unwrap();
        let forward = detect(&ma3, &ma7).unwrap();
        let backward = detect(&ma7, &ma3).unwrap();

        assert_eq!(crossing_indices(&ma3, &ma7).unwrap().len(), 1);
        for (f, b) in forward.iter().zip(&backward) {
            assert_eq!(*f, -*b);
        }
    }
}

mod csv_round_trip {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn intersection_from_csv_history() {
        let dir = TempDir::new().unwrap();
        let closes = [
            100.0, 102.0, 101.0, 105.0, 107.0, 106.0, 110.0, 108.0, 104.0, 103.0, 101.0, 99.0,
            98.0, 97.5,
        ];
        write_csv(dir.path(), "NVDA", &series_from("2020-04-20", &closes));

        let adapter = CsvPriceAdapter::new(dir.path().to_path_buf());
        let series = adapter.fetch_prices("NVDA").unwrap();
        let result = predict(&series, 3, 13, None).unwrap();

        let mut extended = closes.to_vec();
        extended.push(result.predicted_price);
        let next = series_from("2020-04-20", &extended);
        let ma3 = calculate_sma(&next, 3).unwrap().last().unwrap();
        let ma13 = calculate_sma(&next, 13).unwrap().last().unwrap();
        assert_relative_eq!(ma3, ma13, max_relative = 1e-9);

        let diff = difference(&series, 3, 13, None).unwrap();
        assert_relative_eq!(diff.last_close, 97.5);
        assert_relative_eq!(diff.difference, result.predicted_price - 97.5, max_relative = 1e-12);
    }

    #[test]
    fn signal_table_written_to_disk() {
        let dir = TempDir::new().unwrap();
        let series = series_from("2020-01-01", &v_shape(10, 10));
        write_csv(dir.path(), "QQQ", &series);

        let adapter = CsvPriceAdapter::new(dir.path().to_path_buf());
        let loaded = adapter.fetch_prices("QQQ").unwrap();
        assert_eq!(loaded, series);

        let matrix = compute_crossing_matrix(&loaded, &[2, 5, 10]).unwrap();
        let table = SignalTable::build(&loaded, &matrix, &compute_up_down(&loaded)).unwrap();
        let out = dir.path().join("QQQ_signals.csv");
        CsvSignalWriter.write_signals(&table, &out).unwrap();

        let content = std::fs::read_to_string(&out).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "Date,Close,PctChange,UpDown,2x5,2x10,5x10");
        assert_eq!(lines.len(), 21);
        assert!(lines[12].starts_with("2020-01-12,94,"));
        assert!(lines[12].contains(",1,1,"));
    }
}
