use crate::core::coordinate::{parse_coordinate, CoordinateError};
use crate::core::{AccumulationSummary, MapContext, Result};
use crate::domain::model::{
    Coordinate, MapPath, Marker, PlotMode, PlotStyle, Region, DESTINATION_COLUMN, ORIGIN_COLUMN,
};
use crate::utils::error::PlotError;
use csv::{ByteRecord, ReaderBuilder};
use std::io::Read;

#[derive(Debug, Clone)]
pub struct AccumulatorOptions {
    /// Maximum number of data rows to examine; 0 means unlimited.
    pub limit: usize,
    pub mode: PlotMode,
    pub region: Region,
    pub origin_column: usize,
    pub destination_column: usize,
    pub style: PlotStyle,
}

impl Default for AccumulatorOptions {
    fn default() -> Self {
        Self {
            limit: 0,
            mode: PlotMode::Plot,
            region: Region::default(),
            origin_column: ORIGIN_COLUMN,
            destination_column: DESTINATION_COLUMN,
            style: PlotStyle::default(),
        }
    }
}

impl AccumulatorOptions {
    fn min_fields(&self) -> usize {
        self.origin_column.max(self.destination_column) + 1
    }

    fn limit_reached(&self, examined: usize) -> bool {
        self.limit > 0 && examined >= self.limit
    }
}

/// Reads trip rows from `input` and adds their markers (and paths in line
/// mode) to `ctx`.
///
/// The header row is skipped. Rows whose origin or destination does not
/// parse (including bytes that are not UTF-8) are counted and skipped; rows
/// missing either column abort the run. Other columns are never decoded.
pub fn accumulate<R: Read, M: MapContext + ?Sized>(
    input: R,
    options: &AccumulatorOptions,
    ctx: &mut M,
) -> Result<AccumulationSummary> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let mut summary = AccumulationSummary::default();
    let mut record = ByteRecord::new();
    let min_fields = options.min_fields();

    while !options.limit_reached(summary.rows_examined)
        && reader.read_byte_record(&mut record)?
    {
        summary.rows_examined += 1;
        let row = summary.rows_examined;

        if record.len() < min_fields {
            return Err(PlotError::MissingColumn {
                row,
                expected: min_fields,
                found: record.len(),
            });
        }

        match trip_endpoints(&record, options) {
            Ok((origin, destination)) => {
                add_trip(ctx, origin, destination, options);
                summary.rows_plotted += 1;
            }
            Err(e) => {
                tracing::debug!("Skipping row {}: {}", row, e);
                match e {
                    CoordinateError::Malformed => summary.rejections.malformed += 1,
                    CoordinateError::NotANumber => summary.rejections.not_a_number += 1,
                    CoordinateError::OutOfRange => summary.rejections.out_of_range += 1,
                }
            }
        }
    }

    if summary.rows_rejected() > 0 {
        tracing::warn!(
            "⚠️ Skipped {} of {} rows (malformed: {}, not a number: {}, out of range: {})",
            summary.rows_rejected(),
            summary.rows_examined,
            summary.rejections.malformed,
            summary.rejections.not_a_number,
            summary.rejections.out_of_range
        );
    }

    Ok(summary)
}

fn trip_endpoints(
    record: &ByteRecord,
    options: &AccumulatorOptions,
) -> std::result::Result<(Coordinate, Coordinate), CoordinateError> {
    let field = |i: usize| match record.get(i) {
        Some(bytes) => std::str::from_utf8(bytes).map_err(|_| CoordinateError::Malformed),
        None => Ok(""),
    };

    let origin = parse_coordinate(field(options.origin_column)?, &options.region)?;
    let destination = parse_coordinate(field(options.destination_column)?, &options.region)?;
    Ok((origin, destination))
}

fn add_trip<M: MapContext + ?Sized>(
    ctx: &mut M,
    origin: Coordinate,
    destination: Coordinate,
    options: &AccumulatorOptions,
) {
    let style = &options.style;

    ctx.add_marker(Marker::new(origin, style.origin_color, style.marker_radius));
    ctx.add_marker(Marker::new(
        destination,
        style.destination_color,
        style.marker_radius,
    ));

    if options.mode == PlotMode::Line {
        ctx.add_path(MapPath::new(
            vec![origin, destination],
            style.path_color,
            style.path_width,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Color;

    #[derive(Default)]
    struct RecordingContext {
        markers: Vec<Marker>,
        paths: Vec<MapPath>,
    }

    impl MapContext for RecordingContext {
        fn add_marker(&mut self, marker: Marker) {
            self.markers.push(marker);
        }

        fn add_path(&mut self, path: MapPath) {
            self.paths.push(path);
        }

        fn markers(&self) -> &[Marker] {
            &self.markers
        }

        fn paths(&self) -> &[MapPath] {
            &self.paths
        }
    }

    const HEADER: &str = "c0,c1,c2,c3,c4,c5,c6,c7,c8,origin,c10,c11,destination";

    fn row(origin: &str, destination: &str) -> String {
        format!("a,b,c,d,e,f,g,h,i,\"{}\",k,l,\"{}\"", origin, destination)
    }

    fn csv_of(rows: &[String]) -> String {
        let mut content = HEADER.to_string();
        for r in rows {
            content.push('\n');
            content.push_str(r);
        }
        content.push('\n');
        content
    }

    fn options(mode: PlotMode, limit: usize) -> AccumulatorOptions {
        AccumulatorOptions {
            mode,
            limit,
            ..Default::default()
        }
    }

    #[test]
    fn test_sentinel_row_is_skipped() {
        let content = csv_of(&[
            row("-6.2,106.8", "-7.25,112.75"),
            row("-999,-999", "-7.25,112.75"),
        ]);
        let mut ctx = RecordingContext::default();

        let summary =
            accumulate(content.as_bytes(), &options(PlotMode::Plot, 0), &mut ctx).unwrap();

        assert_eq!(summary.rows_examined, 2);
        assert_eq!(summary.rows_plotted, 1);
        assert_eq!(summary.rejections.malformed, 1);
        assert_eq!(ctx.markers.len(), 2);
        assert_eq!(ctx.markers[0].position, Coordinate::new(-6.2, 106.8));
        assert_eq!(ctx.markers[0].color, Color::GREEN);
        assert_eq!(ctx.markers[1].position, Coordinate::new(-7.25, 112.75));
        assert_eq!(ctx.markers[1].color, Color::RED);
        assert_eq!(ctx.markers[1].radius, 4.0);
        assert!(ctx.paths.is_empty());
    }

    #[test]
    fn test_line_mode_adds_one_path_per_valid_row() {
        let content = csv_of(&[
            row("-6.2,106.8", "-7.25,112.75"),
            row("abc,12.0", "-7.25,112.75"),
            row("-8.65,115.2", "-0.9,119.9"),
        ]);
        let mut ctx = RecordingContext::default();

        let summary =
            accumulate(content.as_bytes(), &options(PlotMode::Line, 0), &mut ctx).unwrap();

        assert_eq!(summary.rows_examined, 3);
        assert_eq!(summary.rejections.not_a_number, 1);
        assert_eq!(ctx.markers.len(), 4);
        assert_eq!(ctx.paths.len(), 2);
        assert_eq!(
            ctx.paths[1].points,
            vec![Coordinate::new(-8.65, 115.2), Coordinate::new(-0.9, 119.9)]
        );
        assert_eq!(ctx.paths[1].color, Color::BLACK);
        assert_eq!(ctx.paths[1].width, 1.0);
    }

    #[test]
    fn test_limit_bounds_rows_examined() {
        let rows: Vec<String> = (0..5).map(|_| row("-999,-999", "-999,-999")).collect();
        let content = csv_of(&rows);
        let mut ctx = RecordingContext::default();

        let summary =
            accumulate(content.as_bytes(), &options(PlotMode::Plot, 1), &mut ctx).unwrap();
        assert_eq!(summary.rows_examined, 1);
        assert!(ctx.markers.is_empty());

        let summary =
            accumulate(content.as_bytes(), &options(PlotMode::Plot, 0), &mut ctx).unwrap();
        assert_eq!(summary.rows_examined, 5);

        let summary =
            accumulate(content.as_bytes(), &options(PlotMode::Plot, 50), &mut ctx).unwrap();
        assert_eq!(summary.rows_examined, 5);
    }

    #[test]
    fn test_limit_stops_before_unread_bad_rows() {
        let content = csv_of(&[row("-6.2,106.8", "-7.25,112.75"), "too,short".to_string()]);
        let mut ctx = RecordingContext::default();

        let summary =
            accumulate(content.as_bytes(), &options(PlotMode::Plot, 1), &mut ctx).unwrap();
        assert_eq!(summary.rows_examined, 1);
        assert_eq!(ctx.markers.len(), 2);
    }

    #[test]
    fn test_short_row_is_fatal() {
        let content = csv_of(&[row("-6.2,106.8", "-7.25,112.75"), "too,short".to_string()]);
        let mut ctx = RecordingContext::default();

        let err = accumulate(content.as_bytes(), &options(PlotMode::Plot, 0), &mut ctx)
            .unwrap_err();
        match err {
            PlotError::MissingColumn {
                row,
                expected,
                found,
            } => {
                assert_eq!(row, 2);
                assert_eq!(expected, 13);
                assert_eq!(found, 2);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_header_only_file() {
        let content = csv_of(&[]);
        let mut ctx = RecordingContext::default();

        let summary =
            accumulate(content.as_bytes(), &options(PlotMode::Line, 0), &mut ctx).unwrap();
        assert_eq!(summary, AccumulationSummary::default());
    }

    #[test]
    fn test_out_of_range_destination_skips_whole_row() {
        let content = csv_of(&[row("-6.2,106.8", "95.311,12.50")]);
        let mut ctx = RecordingContext::default();

        let summary =
            accumulate(content.as_bytes(), &options(PlotMode::Line, 0), &mut ctx).unwrap();
        assert_eq!(summary.rejections.out_of_range, 1);
        assert!(ctx.markers.is_empty());
        assert!(ctx.paths.is_empty());
    }

    #[test]
    fn test_custom_columns() {
        let content = "o,d\n\"-6.2,106.8\",\"-7.25,112.75\"\n";
        let opts = AccumulatorOptions {
            origin_column: 0,
            destination_column: 1,
            ..Default::default()
        };
        let mut ctx = RecordingContext::default();

        let summary = accumulate(content.as_bytes(), &opts, &mut ctx).unwrap();
        assert_eq!(summary.rows_plotted, 1);
        assert_eq!(ctx.markers.len(), 2);
    }

    #[test]
    fn test_latin1_in_unused_column_still_plots() {
        let mut content = csv_of(&[row("-6.2,106.8", "-7.25,112.75")]).into_bytes();
        content.extend_from_slice(b"Jos\xe9,b,c,d,e,f,g,h,i,\"-8.65,115.2\",k,l,\"-0.9,119.9\"\n");
        content.extend_from_slice(row("-7.8,110.4", "-6.9,107.6").as_bytes());
        content.push(b'\n');
        let mut ctx = RecordingContext::default();

        let summary =
            accumulate(content.as_slice(), &options(PlotMode::Plot, 0), &mut ctx).unwrap();
        assert_eq!(summary.rows_examined, 3);
        assert_eq!(summary.rows_plotted, 3);
        assert_eq!(ctx.markers.len(), 6);
        assert_eq!(ctx.markers[2].position, Coordinate::new(-8.65, 115.2));
    }

    #[test]
    fn test_latin1_in_origin_is_malformed() {
        let mut content = csv_of(&[row("-6.2,106.8", "-7.25,112.75")]).into_bytes();
        content.extend_from_slice(b"a,b,c,d,e,f,g,h,i,\"-8.65\xb0,115.2\",k,l,\"-0.9,119.9\"\n");
        let mut ctx = RecordingContext::default();

        let summary =
            accumulate(content.as_slice(), &options(PlotMode::Line, 0), &mut ctx).unwrap();
        assert_eq!(summary.rows_examined, 2);
        assert_eq!(summary.rows_plotted, 1);
        assert_eq!(summary.rejections.malformed, 1);
        assert_eq!(ctx.markers.len(), 2);
        assert_eq!(ctx.paths.len(), 1);
    }
}
