#![allow(dead_code)]

use bike_dash::data::Dataset;
use bike_dash::io::read_dataset;

pub const HEADER: &str = "Date,Rented Bike Count,Hour,Temperature(C),Seasons,Holiday,Functioning Day,Winter,Summer,Spring,Autumn";

pub const SEASONS: [&str; 4] = ["Winter", "Spring", "Summer", "Autumn"];

/// Small hand-written dataset spanning three months and two seasons.
pub const FIXTURE: &str = "\
Date,Rented Bike Count,Hour,Temperature(C),Seasons,Holiday,Functioning Day,Winter,Summer,Spring,Autumn
01/12/2017,254,0,-5.2,Winter,0,0,1,0,0,0
01/12/2017,204,1,-5.5,Winter,0,0,1,0,0,0
25/12/2017,107,12,-1.0,Winter,1,0,1,0,0,0
03/01/2018,90,8,-8.1,Winter,0,1,1,0,0,0
01/03/2018,300,8,4.5,Spring,1,0,0,0,1,0
15/03/2018,410,18,9.0,Spring,0,0,0,0,1,0
";

pub fn fixture() -> Dataset {
    read_dataset(FIXTURE.as_bytes()).expect("fixture loads")
}

/// One generated row: (day, month, year, count, hour, season index, holiday code).
pub type RawRow = (u32, u32, i32, u32, u32, usize, u8);

pub fn csv_from_rows(rows: &[RawRow]) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');
    for &(day, month, year, count, hour, season, holiday) in rows {
        let onehot: Vec<&str> = ["Winter", "Summer", "Spring", "Autumn"]
            .iter()
            .map(|s| if *s == SEASONS[season] { "1" } else { "0" })
            .collect();
        out.push_str(&format!(
            "{day:02}/{month:02}/{year},{count},{hour},{:.1},{},{holiday},0,{}\n",
            hour as f64 * 0.5,
            SEASONS[season],
            onehot.join(",")
        ));
    }
    out
}
