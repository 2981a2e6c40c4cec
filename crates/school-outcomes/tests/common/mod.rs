#![allow(dead_code)]

use school_outcomes::pipeline::{ColumnLayout, PreparedDatasets, RawInputs, RawTable};
use std::io::Cursor;

pub const PREAMBLE: &str = "学校基本調査 都道府県別\n\n(単位：人)\n,,,\n注）令和7年5月1日現在\n";

pub const HIGH_SCHOOLS: &str = "区分,計,国立,公立,私立\n\
北海道,270,1,200,69\n\
青　森,75,0,60,15\n\
東京都,430,5,185,240\n\
大阪府,250,1,150,99\n\
沖縄県,60,0,55,5\n";

pub const UNIVERSITIES: &str = "区分,計,国立,公立,私立\n\
北海道,37,7,5,25\n\
東京都,144,12,2,130\n\
大阪府,58,2,3,53\n\
京都府,34,3,2,29\n";

pub const NATIONAL: &str = "区分,卒業者数,大学等進学者,専修学校進学者\n\
北海道,100,40,10\n\
青森,50,20,5\n\
東京都,200,120,10\n\
大阪府,150,75,10\n\
沖縄県,20,5,2\n";

pub const PUBLIC: &str = "区分,卒業者数,大学等進学者,専修学校進学者\n\
北海道,200,80,30\n\
青森,100,30,20\n\
東京都,300,200,40\n\
大阪府,250,100,50\n\
沖縄県,80,20,15\n";

pub const PRIVATE: &str = "区分,卒業者数,大学等進学者,専修学校進学者\n\
北海道,50,20,10\n\
青森,50,10,10\n\
東京都,500,380,50\n\
大阪府,200,115,30\n\
沖縄県,100,25,20\n";

pub fn with_preamble(body: &str) -> String {
    format!("{PREAMBLE}{body}")
}

pub fn raw(name: &str, body: &str) -> RawTable {
    RawTable::from_csv_reader(name, Cursor::new(with_preamble(body)), 5)
        .expect("fixture table parses")
}

pub fn raw_inputs() -> RawInputs {
    RawInputs {
        high_school: raw("high_schools.csv", HIGH_SCHOOLS),
        university: raw("universities.csv", UNIVERSITIES),
        outcomes: [
            raw("national.csv", NATIONAL),
            raw("public.csv", PUBLIC),
            raw("private.csv", PRIVATE),
        ],
    }
}

pub fn prepared() -> PreparedDatasets {
    PreparedDatasets::from_raw(raw_inputs(), &ColumnLayout::default())
        .expect("fixture datasets prepare")
}
