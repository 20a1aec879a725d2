use actix_web::HttpResponse;

use crate::error::Error;

/// Generate a CSV response from serializable data. Fields are quoted and
/// escaped by the writer, so embedded delimiters survive a round trip.
pub fn to_csv_response<T: serde::Serialize>(
    data: &[T],
    filename: &str,
) -> Result<HttpResponse, Error> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for record in data {
        wtr.serialize(record).map_err(|e| {
            Error::ServerError(format!("CSV serialization error: {}", e))
        })?;
    }
    let csv_data = wtr
        .into_inner()
        .map_err(|e| Error::ServerError(format!("CSV writer error: {}", e)))?;
    let csv_string = String::from_utf8(csv_data)?;

    Ok(HttpResponse::Ok()
        .content_type("text/csv")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", filename),
        ))
        .body(csv_string))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Row {
        name: String,
        count: i64,
    }

    fn render(rows: &[Row]) -> String {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for row in rows {
            wtr.serialize(row).unwrap();
        }
        String::from_utf8(wtr.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn round_trip_preserves_row_and_column_counts() {
        let rows = vec![
            Row {
                name: "harambee".to_string(),
                count: 3,
            },
            Row {
                name: "ujamaa".to_string(),
                count: 7,
            },
        ];
        let rendered = render(&rows);

        let mut reader = csv::Reader::from_reader(rendered.as_bytes());
        let parsed: Vec<csv::StringRecord> =
            reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(parsed.len(), rows.len());
        assert!(parsed.iter().all(|record| record.len() == 2));
    }

    #[test]
    fn embedded_delimiters_are_escaped() {
        let rows = vec![Row {
            name: "savings, emergency".to_string(),
            count: 1,
        }];
        let rendered = render(&rows);

        let mut reader = csv::Reader::from_reader(rendered.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[0], "savings, emergency");
    }

    #[test]
    fn response_carries_csv_headers() {
        let rows = vec![Row {
            name: "harambee".to_string(),
            count: 3,
        }];
        let response = to_csv_response(&rows, "export.csv").unwrap();
        assert_eq!(
            response
                .headers()
                .get("Content-Type")
                .unwrap()
                .to_str()
                .unwrap(),
            "text/csv"
        );
        assert!(response
            .headers()
            .get("Content-Disposition")
            .unwrap()
            .to_str()
            .unwrap()
            .contains("export.csv"));
    }
}
