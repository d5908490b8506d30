#[cfg(test)]
mod tests {
    use crate::aqi::Classifier;
    use crate::models::{
        group_forecasts, ForecastPoint, MeasurementSample, MeasurementSummary, Pollutant,
        PollutantReading,
    };
    use crate::pipeline::{compare, rank_rows, reduce, summarise, summarise_samples};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::collections::BTreeMap;

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap()
    }

    // Helper to build a forecast point whose levels follow the default classifier
    fn create_forecast(location: &str, hour: i64, values: &[(Pollutant, f64)]) -> ForecastPoint {
        let classifier = Classifier::default();
        let pollutants: BTreeMap<Pollutant, PollutantReading> = values
            .iter()
            .map(|(p, v)| {
                (
                    *p,
                    PollutantReading {
                        aqi_level: classifier.classify(Some(*v), *p),
                        value: *v,
                    },
                )
            })
            .collect();
        ForecastPoint {
            location_name: location.to_string(),
            valid_time: base_time() + Duration::hours(hour),
            overall_aqi_level: Classifier::overall(pollutants.values().map(|r| r.aqi_level)),
            pollutants,
        }
    }

    // Helper to build an averaged measurement in the same way
    fn create_summary(location: &str, hour: i64, values: &[(Pollutant, f64)]) -> MeasurementSummary {
        let point = create_forecast(location, hour, values);
        MeasurementSummary {
            location_name: point.location_name,
            timestamp: point.valid_time,
            overall_aqi_level: point.overall_aqi_level,
            pollutants: point.pollutants,
        }
    }

    fn create_sample(location: &str, site: &str, minutes: i64, values: &[(Pollutant, f64)]) -> MeasurementSample {
        MeasurementSample {
            site_name: site.to_string(),
            location_name: location.to_string(),
            timestamp: base_time() + Duration::minutes(minutes),
            pollutants: values.iter().copied().collect(),
        }
    }

    #[test]
    fn test_end_to_end_largest_deviation_at_six() {
        // 06:00 forecasts level 6 (o3 900, pm10 160) against measured level 3.
        let forecasts = group_forecasts(vec![
            create_forecast("Athens", 3, &[(Pollutant::O3, 110.0), (Pollutant::Pm10, 45.0)]),
            create_forecast("Athens", 6, &[(Pollutant::O3, 900.0), (Pollutant::Pm10, 160.0)]),
            create_forecast("Athens", 9, &[(Pollutant::O3, 60.0), (Pollutant::Pm10, 30.0)]),
        ]);
        let measurements: BTreeMap<String, Vec<MeasurementSummary>> = [(
            "Athens".to_string(),
            vec![
                create_summary("Athens", 3, &[(Pollutant::O3, 95.0), (Pollutant::Pm10, 42.0)]),
                create_summary("Athens", 6, &[(Pollutant::O3, 125.04), (Pollutant::Pm10, 48.26)]),
                create_summary("Athens", 9, &[(Pollutant::O3, 70.0), (Pollutant::Pm10, 35.0)]),
            ],
        )]
        .into_iter()
        .collect();

        let rows = summarise(&forecasts, &measurements);
        assert_eq!(rows.len(), 1);
        let row = &rows[0];

        assert_eq!(row.aqi_difference.as_deref(), Some("+3"));
        assert_eq!(row.forecast.aqi_level, 6);
        let measured = row.measurements.as_ref().expect("measurements should be present");
        assert_eq!(measured.aqi_level, 3);

        let six = base_time() + Duration::hours(6);
        let o3 = row.forecast.per_pollutant[&Pollutant::O3];
        assert_eq!(o3.time, six);
        assert_eq!(o3.value, 900.0);
        let pm10 = row.forecast.per_pollutant[&Pollutant::Pm10];
        assert_eq!(pm10.time, six);
        assert_eq!(pm10.value, 160.0);

        assert_eq!(measured.per_pollutant[&Pollutant::O3].value, 125.0);
        assert_eq!(measured.per_pollutant[&Pollutant::Pm10].value, 48.3);
    }

    #[test]
    fn test_no_measurements_returns_latest_forecast() {
        let points = vec![
            create_forecast("Berlin", 12, &[(Pollutant::No2, 95.0), (Pollutant::So2, 20.0)]),
            create_forecast("Berlin", 30, &[(Pollutant::No2, 35.0), (Pollutant::So2, 210.0)]),
            create_forecast("Lyon", 1, &[(Pollutant::Pm2_5, 22.0)]),
            create_forecast("Berlin", 24, &[(Pollutant::No2, 300.0)]),
        ];
        let latest_berlin = points[1].clone();
        let latest_lyon = points[2].clone();
        let forecasts = group_forecasts(points);

        let comparisons = compare(&forecasts, &BTreeMap::new());
        assert_eq!(comparisons.len(), 2);

        for (comparison, latest) in comparisons.iter().zip([&latest_berlin, &latest_lyon]) {
            assert_eq!(comparison.location_name, latest.location_name);
            assert_eq!(comparison.forecast_overall_aqi, latest.overall_aqi_level);
            assert_eq!(comparison.per_pollutant.len(), latest.pollutants.len());
            for (pollutant, reading) in &latest.pollutants {
                let c = &comparison.per_pollutant[pollutant];
                assert_eq!(c.forecast_data.aqi_level, reading.aqi_level);
                assert_eq!(c.forecast_data.value, reading.value);
                assert_eq!(c.forecast_data.valid_time, latest.valid_time);
                assert!(c.measurement_data.is_none());
            }
        }
    }

    #[test]
    fn test_tie_break_prefers_higher_forecast_then_earlier() {
        // Hour 1: forecast 2 vs measured 4 (diff 2, forecast 2)
        // Hour 2: forecast 4 vs measured 2 (diff 2, forecast 4) -> replaces hour 1
        // Hour 3: forecast 4 vs measured 2 (diff 2, forecast 4) -> equal, hour 2 kept
        let forecasts = group_forecasts(vec![
            create_forecast("Paris", 1, &[(Pollutant::No2, 60.0)]),
            create_forecast("Paris", 2, &[(Pollutant::No2, 200.0)]),
            create_forecast("Paris", 3, &[(Pollutant::No2, 210.0)]),
        ]);
        let measurements: BTreeMap<String, Vec<MeasurementSummary>> = [(
            "Paris".to_string(),
            vec![
                create_summary("Paris", 1, &[(Pollutant::No2, 200.0)]),
                create_summary("Paris", 2, &[(Pollutant::No2, 50.0)]),
                create_summary("Paris", 3, &[(Pollutant::No2, 55.0)]),
            ],
        )]
        .into_iter()
        .collect();

        let comparisons = compare(&forecasts, &measurements);
        let no2 = &comparisons[0].per_pollutant[&Pollutant::No2];
        assert_eq!(no2.aqi_difference, Some(2));
        assert_eq!(no2.forecast_data.valid_time, base_time() + Duration::hours(2));
        assert_eq!(reduce(&comparisons[0]).aqi_difference.as_deref(), Some("+2"));
    }

    #[test]
    fn test_raw_samples_through_full_pipeline() {
        let classifier = Classifier::default();
        let forecasts = group_forecasts(vec![
            create_forecast("Madrid", 0, &[(Pollutant::Pm2_5, 8.0)]),
            create_forecast("Madrid", 1, &[(Pollutant::Pm2_5, 8.0)]),
            create_forecast("Seville", 1, &[(Pollutant::Pm2_5, 30.0)]),
            create_forecast("Valencia", 1, &[(Pollutant::Pm2_5, 30.0)]),
        ]);
        let samples = vec![
            // Madrid 01:00 bucket: (70 + 90) / 2 = 80 -> level 6; the zero is ignored.
            create_sample("Madrid", "Castellana", 40, &[(Pollutant::Pm2_5, 70.0)]),
            create_sample("Madrid", "Retiro", 89, &[(Pollutant::Pm2_5, 90.0)]),
            create_sample("Madrid", "Vallecas", 60, &[(Pollutant::Pm2_5, 0.0)]),
            // Madrid 00:00 bucket matches the forecast exactly.
            create_sample("Madrid", "Retiro", 5, &[(Pollutant::Pm2_5, 9.0)]),
            // Seville: level 4 vs measured 1.
            create_sample("Seville", "Centro", 61, &[(Pollutant::Pm2_5, 5.0)]),
        ];

        let measurements = summarise_samples(&samples, base_time(), &classifier);
        assert_eq!(measurements["Madrid"].len(), 2);

        let mut rows = summarise(&forecasts, &measurements);
        rank_rows(&mut rows, true);

        let ranked: Vec<(&str, Option<&str>)> = rows
            .iter()
            .map(|r| (r.location_name.as_str(), r.aqi_difference.as_deref()))
            .collect();
        assert_eq!(
            ranked,
            vec![
                ("Madrid", Some("-5")),
                ("Seville", Some("+3")),
                ("Valencia", None),
            ]
        );
        let madrid = &rows[0];
        assert_eq!(
            madrid.measurements.as_ref().unwrap().per_pollutant[&Pollutant::Pm2_5].value,
            80.0
        );
    }
}
