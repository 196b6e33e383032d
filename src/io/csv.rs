use crate::error::HeatmapError;
use crate::sample::LocationSample;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fs::{File, OpenOptions};
use std::path::Path;
use tracing::debug;

pub const LATITUDE_COLUMN: &str = "latitude";
pub const LONGITUDE_COLUMN: &str = "longitude";
pub const CAPTURED_AT_COLUMN: &str = "timestamp";

struct SampleIndices {
    lat_idx: usize,
    lon_idx: usize,
    captured_idx: Option<usize>,
}

fn find_column(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name))
}

fn format_timestamp(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn parse_timestamp(record: &csv::StringRecord, idx: usize) -> Result<DateTime<Utc>, HeatmapError> {
    let raw = record
        .get(idx)
        .ok_or_else(|| {
            HeatmapError::Csv(format!("Missing {} column at index {}", CAPTURED_AT_COLUMN, idx))
        })?
        .trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| {
            HeatmapError::Csv(format!("Invalid {}: '{}' ({})", CAPTURED_AT_COLUMN, raw, e))
        })
}

fn parse_field<T: std::str::FromStr>(
    record: &csv::StringRecord,
    idx: usize,
    name: &str,
) -> Result<T, HeatmapError> {
    let raw = record
        .get(idx)
        .ok_or_else(|| HeatmapError::Csv(format!("Missing {} column at index {}", name, idx)))?
        .trim();
    raw.parse()
        .map_err(|_| HeatmapError::Csv(format!("Invalid {}: '{}'", name, raw)))
}

/// Reads location samples from a CSV file.
///
/// The header must name `latitude` and `longitude` columns (case-insensitive).
/// An optional `timestamp` column holds RFC 3339 times (any offset, stored as
/// UTC); without it every sample is stamped with the Unix epoch. Other columns
/// are ignored.
///
/// # Example
///
/// ```no_run
/// use geoheat::read_samples_csv;
///
/// let samples = read_samples_csv("locations.csv").unwrap();
/// println!("{} samples", samples.len());
/// ```
pub fn read_samples_csv(path: impl AsRef<Path>) -> Result<Vec<LocationSample>, HeatmapError> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);

    let headers = reader.headers()?.clone();
    let indices = SampleIndices {
        lat_idx: find_column(&headers, LATITUDE_COLUMN).ok_or_else(|| {
            HeatmapError::Csv(format!("Column '{}' not found", LATITUDE_COLUMN))
        })?,
        lon_idx: find_column(&headers, LONGITUDE_COLUMN).ok_or_else(|| {
            HeatmapError::Csv(format!("Column '{}' not found", LONGITUDE_COLUMN))
        })?,
        captured_idx: find_column(&headers, CAPTURED_AT_COLUMN),
    };

    let mut samples = Vec::new();
    for result in reader.records() {
        let record = result?;

        let latitude: f64 = parse_field(&record, indices.lat_idx, LATITUDE_COLUMN)?;
        let longitude: f64 = parse_field(&record, indices.lon_idx, LONGITUDE_COLUMN)?;
        let captured_at = match indices.captured_idx {
            Some(idx) => parse_timestamp(&record, idx)?,
            None => DateTime::<Utc>::UNIX_EPOCH,
        };

        samples.push(LocationSample::new(latitude, longitude, captured_at));
    }

    debug!(samples = samples.len(), "read samples from csv");
    Ok(samples)
}

fn write_sample<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    sample: &LocationSample,
) -> Result<(), HeatmapError> {
    writer.write_record(&[
        sample.latitude.to_string(),
        sample.longitude.to_string(),
        format_timestamp(&sample.captured_at),
    ])?;
    Ok(())
}

/// Writes samples to a new CSV file as `latitude,longitude,timestamp`.
pub fn write_samples_csv(
    path: impl AsRef<Path>,
    samples: &[LocationSample],
) -> Result<(), HeatmapError> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);

    writer.write_record([LATITUDE_COLUMN, LONGITUDE_COLUMN, CAPTURED_AT_COLUMN])?;
    for sample in samples {
        write_sample(&mut writer, sample)?;
    }
    writer.flush()?;

    Ok(())
}

/// Appends one sample to a CSV file, creating it (with a header) if needed.
pub fn append_sample_csv(
    path: impl AsRef<Path>,
    sample: &LocationSample,
) -> Result<(), HeatmapError> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let needs_header = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    if needs_header {
        writer.write_record([LATITUDE_COLUMN, LONGITUDE_COLUMN, CAPTURED_AT_COLUMN])?;
    }
    write_sample(&mut writer, sample)?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use claims::assert_matches;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_write_and_read_samples() -> Result<(), HeatmapError> {
        let dir = tempdir()?;
        let path = dir.path().join("samples.csv");

        let samples = vec![
            LocationSample::new(
                40.001,
                -73.001,
                Utc.with_ymd_and_hms(2024, 11, 14, 22, 13, 20).unwrap(),
            ),
            LocationSample::new(-33.8688, 151.2093, Utc::now()),
        ];
        write_samples_csv(&path, &samples)?;

        let read = read_samples_csv(&path)?;
        assert_eq!(read, samples);
        Ok(())
    }

    #[test]
    fn test_append_creates_header_once() -> Result<(), HeatmapError> {
        let dir = tempdir()?;
        let path = dir.path().join("samples.csv");

        append_sample_csv(&path, &LocationSample::new(1.0, 2.0, DateTime::<Utc>::UNIX_EPOCH))?;
        append_sample_csv(&path, &LocationSample::new(3.0, 4.0, DateTime::<Utc>::UNIX_EPOCH))?;

        let contents = std::fs::read_to_string(&path)?;
        assert_eq!(contents.matches(LATITUDE_COLUMN).count(), 1);

        let read = read_samples_csv(&path)?;
        assert_eq!(read.len(), 2);
        assert_eq!(read[1].latitude, 3.0);
        Ok(())
    }

    #[test]
    fn test_extra_columns_and_no_timestamp() -> Result<(), HeatmapError> {
        let dir = tempdir()?;
        let path = dir.path().join("samples.csv");

        let mut file = File::create(&path)?;
        writeln!(file, "Id,Latitude,Longitude,Note")?;
        writeln!(file, "1,40.001,-73.001,home")?;
        writeln!(file, "2, 40.1 , -73.1 ,work")?;

        let read = read_samples_csv(&path)?;
        assert_eq!(read.len(), 2);
        assert_eq!(read[1].longitude, -73.1);
        assert_eq!(read[0].captured_at, DateTime::<Utc>::UNIX_EPOCH);
        Ok(())
    }

    #[test]
    fn test_missing_column() -> Result<(), HeatmapError> {
        let dir = tempdir()?;
        let path = dir.path().join("samples.csv");

        let mut file = File::create(&path)?;
        writeln!(file, "lat,longitude")?;
        writeln!(file, "40.0,-73.0")?;

        assert_matches!(read_samples_csv(&path), Err(HeatmapError::Csv(_)));
        Ok(())
    }

    #[test]
    fn test_invalid_number() -> Result<(), HeatmapError> {
        let dir = tempdir()?;
        let path = dir.path().join("samples.csv");

        let mut file = File::create(&path)?;
        writeln!(file, "latitude,longitude")?;
        writeln!(file, "north,-73.0")?;

        assert_matches!(read_samples_csv(&path), Err(HeatmapError::Csv(_)));
        Ok(())
    }

    #[test]
    fn test_timestamp_offsets_normalize_to_utc() -> Result<(), HeatmapError> {
        let dir = tempdir()?;
        let path = dir.path().join("samples.csv");

        let mut file = File::create(&path)?;
        writeln!(file, "Latitude,Longitude,Timestamp")?;
        writeln!(file, "40.0,-73.0,2024-03-01T09:30:00.1234567-05:00")?;
        writeln!(file, "40.0,-73.0,1969-12-31T23:59:58.5Z")?;

        let read = read_samples_csv(&path)?;
        assert_eq!(
            format_timestamp(&read[0].captured_at),
            "2024-03-01T14:30:00.123456700Z"
        );
        assert_eq!(read[1].captured_at.timestamp_millis(), -1500);
        Ok(())
    }

    #[test]
    fn test_invalid_timestamp() -> Result<(), HeatmapError> {
        let dir = tempdir()?;
        let path = dir.path().join("samples.csv");

        let mut file = File::create(&path)?;
        writeln!(file, "latitude,longitude,timestamp")?;
        writeln!(file, "40.0,-73.0,yesterday")?;

        assert_matches!(read_samples_csv(&path), Err(HeatmapError::Csv(_)));
        Ok(())
    }
}
