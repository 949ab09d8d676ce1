//! Functions for writing CSV format.
//!
//! The ground pivots A and D are constant, so they are not listed in the
//! rows.
use crate::{Error, Report};
use csv::Writer;
use serde::Serialize;

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e.to_string())
    }
}

/// One row of the CSV table.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Row {
    /// Time in seconds
    pub time: f64,
    /// Input angle
    pub theta2: f64,
    /// Coupler angle
    pub theta3: f64,
    /// Follower angle
    pub theta4: f64,
    /// Joint B, X coordinate
    pub bx: f64,
    /// Joint B, Y coordinate
    pub by: f64,
    /// Joint C, X coordinate
    pub cx: f64,
    /// Joint C, Y coordinate
    pub cy: f64,
    /// Tracer point, X coordinate
    pub px: f64,
    /// Tracer point, Y coordinate
    pub py: f64,
    /// Tracer velocity, X component
    pub vx: f64,
    /// Tracer velocity, Y component
    pub vy: f64,
    /// Tracer acceleration, X component
    pub ax: f64,
    /// Tracer acceleration, Y component
    pub ay: f64,
}

impl Report {
    /// Rows of the CSV table.
    pub fn rows(&self) -> impl Iterator<Item = Row> + '_ {
        (0..self.len()).map(move |i| Row {
            time: self.time[i],
            theta2: self.theta2[i],
            theta3: self.theta3[i],
            theta4: self.theta4[i],
            bx: self.b[i][0],
            by: self.b[i][1],
            cx: self.c[i][0],
            cy: self.c[i][1],
            px: self.p[i][0],
            py: self.p[i][1],
            vx: self.vx[i],
            vy: self.vy[i],
            ax: self.ax[i],
            ay: self.ay[i],
        })
    }
}

/// Dump CSV to string, with a header line.
pub fn dump_csv<I, S>(rows: I) -> Result<String, Error>
where
    I: IntoIterator<Item = S>,
    S: Serialize,
{
    let mut w = Writer::from_writer(Vec::new());
    rows.into_iter().try_for_each(|row| w.serialize(row))?;
    let buf = w.into_inner().map_err(|e| Error::Csv(e.to_string()))?;
    String::from_utf8(buf).map_err(|e| Error::Csv(e.to_string()))
}

/// Dump a report to CSV.
pub fn report_csv(report: &Report) -> Result<String, Error> {
    dump_csv(report.rows())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Analysis, LinkSet, SweepCfg};

    #[test]
    fn header_and_rows() {
        let report = Analysis::new(LinkSet::example())
            .sweep(SweepCfg::from_deg_rpm(90., 30.))
            .run()
            .unwrap();
        let s = report_csv(&report).unwrap();
        let mut lines = s.lines();
        assert_eq!(
            lines.next(),
            Some("time,theta2,theta3,theta4,bx,by,cx,cy,px,py,vx,vy,ax,ay")
        );
        assert_eq!(lines.count(), report.len());
        let first = s.lines().nth(1).unwrap().split(',').collect::<Vec<_>>();
        assert_eq!(first.len(), 14);
        assert_eq!(first[0].parse::<f64>().unwrap(), 0.);
        assert_eq!(first[1].parse::<f64>().unwrap(), SweepCfg::START);
    }
}
