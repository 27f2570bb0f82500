//! Fixed choice lists offered by the submission form.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Districts of Kabupaten Garut, in form order
pub const KECAMATAN: [&str; 35] = [
    "Garut Kota",
    "Tarogong Kaler",
    "Tarogong Kidul",
    "Samarang",
    "Leles",
    "Kadungora",
    "Limbangan",
    "Kersamanah",
    "Malangbong",
    "Selaawi",
    "Cibiuk",
    "Leuwigoong",
    "Banyuresmi",
    "Cibatu",
    "Pakenjeng",
    "Karangtengah",
    "Sukawening",
    "Wanaraja",
    "Sucinaraja",
    "Karangpawitan",
    "Talegong",
    "Cisewu",
    "Caringin",
    "Mekarmukti",
    "Bungbulang",
    "Pamulihan",
    "Cilawu",
    "Cikelet",
    "Pameungpeuk",
    "Cibalong",
    "Cisompet",
    "Cisurupan",
    "Garut Selatan",
    "Bayongbong",
    "Singajaya",
];

const SPBU_PREFIX: &str = "SPBU 34.44";
const SPBU_FIRST: u32 = 101;
const SPBU_COUNT: u32 = 24;

/// Kind of measuring equipment being re-calibrated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum JenisUttp {
    #[serde(rename = "Pompa Ukur BBM")]
    PompaUkurBbm,
    #[serde(rename = "Timbangan Jembatan/AMP/Batching Plant")]
    TimbanganJembatan,
    #[serde(rename = "Lainnya")]
    Lainnya,
}

impl JenisUttp {
    pub const ALL: [JenisUttp; 3] = [
        JenisUttp::PompaUkurBbm,
        JenisUttp::TimbanganJembatan,
        JenisUttp::Lainnya,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JenisUttp::PompaUkurBbm => "Pompa Ukur BBM",
            JenisUttp::TimbanganJembatan => "Timbangan Jembatan/AMP/Batching Plant",
            JenisUttp::Lainnya => "Lainnya",
        }
    }
}

impl std::str::FromStr for JenisUttp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|jenis| jenis.as_str() == s)
            .ok_or_else(|| format!("Jenis UTTP '{}' tidak dikenal", s))
    }
}

/// Station codes `SPBU 34.44101` through `SPBU 34.44124`
pub fn spbu_codes() -> Vec<String> {
    (SPBU_FIRST..SPBU_FIRST + SPBU_COUNT)
        .map(|n| format!("{}{}", SPBU_PREFIX, n))
        .collect()
}

pub fn is_known_kecamatan(value: &str) -> bool {
    KECAMATAN.contains(&value)
}

pub fn is_known_spbu(value: &str) -> bool {
    spbu_codes().iter().any(|code| code == value)
}
