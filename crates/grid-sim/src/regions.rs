/// Region catalogue for the forecast selectors. Purely cosmetic: a
/// selection only reseeds the mock data generator.
pub const REGIONS: &[&str] = &["NSW", "VIC", "QLD", "SA", "WA", "TAS", "ACT", "NT"];

pub fn sub_regions(region: &str) -> &'static [&'static str] {
    match region {
        "NSW" => &[
            "Sydney CBD",
            "Eastern Suburbs",
            "Inner West",
            "Parramatta",
            "Newcastle",
            "Wollongong",
            "Central Coast",
            "Blue Mountains",
        ],
        "VIC" => &[
            "Melbourne CBD",
            "Inner East",
            "Bayside",
            "Geelong",
            "Ballarat",
            "Bendigo",
        ],
        "QLD" => &[
            "Brisbane CBD",
            "Gold Coast",
            "Sunshine Coast",
            "Townsville",
            "Cairns",
        ],
        "SA" => &["Adelaide CBD", "Port Adelaide", "Glenelg", "Mount Barker"],
        "WA" => &["Perth CBD", "Fremantle", "Joondalup", "Mandurah", "Bunbury"],
        "TAS" => &["Hobart CBD", "Glenorchy", "Launceston", "Devonport"],
        "ACT" => &["Canberra CBD", "Belconnen", "Gungahlin", "Tuggeranong"],
        "NT" => &["Darwin CBD", "Palmerston", "Alice Springs"],
        _ => &[],
    }
}

/// Falls back to the region's first sub-region when the requested one does
/// not belong to it (mirrors the selector resync on region change).
pub fn resolve_sub_region(region: &str, requested: &str) -> Option<&'static str> {
    let list = sub_regions(region);
    list.iter()
        .find(|candidate| **candidate == requested)
        .or_else(|| list.first())
        .copied()
}
