// src/render/world.rs

use anyhow::Result;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use tracing::debug;

use super::svg::{ColorRamp, SvgDocument};
use super::{Choropleth, RegionMap};

/// A region the world map can draw: lower-case alpha-2 code, display name and
/// approximate centroid in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Country {
    pub code: &'static str,
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

const fn c(code: &'static str, name: &'static str, lat: f64, lon: f64) -> Country {
    Country {
        code,
        name,
        lat,
        lon,
    }
}

pub static COUNTRIES: &[Country] = &[
    c("ad", "Andorra", 42.5, 1.5),
    c("ae", "United Arab Emirates", 24.0, 54.0),
    c("af", "Afghanistan", 33.0, 65.0),
    c("al", "Albania", 41.0, 20.0),
    c("am", "Armenia", 40.0, 45.0),
    c("ao", "Angola", -12.5, 18.5),
    c("aq", "Antarctica", -75.0, 0.0),
    c("ar", "Argentina", -34.0, -64.0),
    c("at", "Austria", 47.3, 13.3),
    c("au", "Australia", -25.0, 134.0),
    c("az", "Azerbaijan", 40.5, 47.5),
    c("ba", "Bosnia and Herzegovina", 44.0, 18.0),
    c("bd", "Bangladesh", 24.0, 90.0),
    c("be", "Belgium", 50.8, 4.0),
    c("bf", "Burkina Faso", 13.0, -2.0),
    c("bg", "Bulgaria", 43.0, 25.0),
    c("bh", "Bahrain", 26.0, 50.5),
    c("bi", "Burundi", -3.5, 30.0),
    c("bj", "Benin", 9.5, 2.3),
    c("bn", "Brunei Darussalam", 4.5, 114.7),
    c("bo", "Bolivia, Plurinational State of", -17.0, -65.0),
    c("br", "Brazil", -10.0, -55.0),
    c("bt", "Bhutan", 27.5, 90.5),
    c("bw", "Botswana", -22.0, 24.0),
    c("by", "Belarus", 53.0, 28.0),
    c("bz", "Belize", 17.3, -88.8),
    c("ca", "Canada", 60.0, -95.0),
    c("cd", "Congo, the Democratic Republic of the", -2.5, 23.5),
    c("cf", "Central African Republic", 7.0, 21.0),
    c("cg", "Congo", -1.0, 15.0),
    c("ch", "Switzerland", 47.0, 8.0),
    c("ci", "Cote d'Ivoire", 8.0, -5.0),
    c("cl", "Chile", -30.0, -71.0),
    c("cm", "Cameroon", 6.0, 12.0),
    c("cn", "China", 35.0, 105.0),
    c("co", "Colombia", 4.0, -72.0),
    c("cr", "Costa Rica", 10.0, -84.0),
    c("cu", "Cuba", 21.5, -80.0),
    c("cv", "Cape Verde", 16.0, -24.0),
    c("cy", "Cyprus", 35.0, 33.0),
    c("cz", "Czech Republic", 49.8, 15.5),
    c("de", "Germany", 51.0, 9.0),
    c("dj", "Djibouti", 11.5, 43.0),
    c("dk", "Denmark", 56.0, 10.0),
    c("do", "Dominican Republic", 19.0, -70.7),
    c("dz", "Algeria", 28.0, 3.0),
    c("ec", "Ecuador", -2.0, -77.5),
    c("ee", "Estonia", 59.0, 26.0),
    c("eg", "Egypt", 27.0, 30.0),
    c("eh", "Western Sahara", 24.5, -13.0),
    c("er", "Eritrea", 15.0, 39.0),
    c("es", "Spain", 40.0, -4.0),
    c("et", "Ethiopia", 8.0, 38.0),
    c("fi", "Finland", 64.0, 26.0),
    c("fr", "France", 46.0, 2.0),
    c("ga", "Gabon", -1.0, 11.8),
    c("gb", "United Kingdom", 54.0, -2.0),
    c("ge", "Georgia", 42.0, 43.5),
    c("gf", "French Guiana", 4.0, -53.0),
    c("gh", "Ghana", 8.0, -2.0),
    c("gl", "Greenland", 72.0, -40.0),
    c("gm", "Gambia", 13.5, -15.5),
    c("gn", "Guinea", 11.0, -10.0),
    c("gq", "Equatorial Guinea", 2.0, 10.0),
    c("gr", "Greece", 39.0, 22.0),
    c("gt", "Guatemala", 15.5, -90.3),
    c("gu", "Guam", 13.4, 144.8),
    c("gw", "Guinea-Bissau", 12.0, -15.0),
    c("gy", "Guyana", 5.0, -59.0),
    c("hk", "Hong Kong", 22.3, 114.2),
    c("hn", "Honduras", 15.0, -86.5),
    c("hr", "Croatia", 45.2, 15.5),
    c("ht", "Haiti", 19.0, -72.4),
    c("hu", "Hungary", 47.0, 20.0),
    c("id", "Indonesia", -5.0, 120.0),
    c("ie", "Ireland", 53.0, -8.0),
    c("il", "Israel", 31.5, 34.8),
    c("in", "India", 20.0, 77.0),
    c("iq", "Iraq", 33.0, 44.0),
    c("ir", "Iran, Islamic Republic of", 32.0, 53.0),
    c("is", "Iceland", 65.0, -18.0),
    c("it", "Italy", 42.8, 12.8),
    c("jm", "Jamaica", 18.1, -77.3),
    c("jo", "Jordan", 31.0, 36.0),
    c("jp", "Japan", 36.0, 138.0),
    c("ke", "Kenya", 1.0, 38.0),
    c("kg", "Kyrgyzstan", 41.0, 75.0),
    c("kh", "Cambodia", 13.0, 105.0),
    c("kp", "Korea, Democratic People's Republic of", 40.0, 127.0),
    c("kr", "Korea, Republic of", 37.0, 127.5),
    c("kw", "Kuwait", 29.3, 47.7),
    c("kz", "Kazakhstan", 48.0, 68.0),
    c("la", "Lao People's Democratic Republic", 18.0, 105.0),
    c("lb", "Lebanon", 33.8, 35.8),
    c("li", "Liechtenstein", 47.2, 9.5),
    c("lk", "Sri Lanka", 7.0, 81.0),
    c("lr", "Liberia", 6.5, -9.5),
    c("ls", "Lesotho", -29.5, 28.5),
    c("lt", "Lithuania", 56.0, 24.0),
    c("lu", "Luxembourg", 49.8, 6.2),
    c("lv", "Latvia", 57.0, 25.0),
    c("ly", "Libyan Arab Jamahiriya", 25.0, 17.0),
    c("ma", "Morocco", 32.0, -5.0),
    c("mc", "Monaco", 43.7, 7.4),
    c("md", "Moldova, Republic of", 47.0, 29.0),
    c("me", "Montenegro", 42.5, 19.3),
    c("mg", "Madagascar", -20.0, 47.0),
    c("mk", "Macedonia, the former Yugoslav Republic of", 41.6, 21.7),
    c("ml", "Mali", 17.0, -4.0),
    c("mm", "Myanmar", 22.0, 98.0),
    c("mn", "Mongolia", 46.0, 105.0),
    c("mo", "Macao", 22.2, 113.5),
    c("mr", "Mauritania", 20.0, -12.0),
    c("mt", "Malta", 35.9, 14.4),
    c("mu", "Mauritius", -20.3, 57.6),
    c("mv", "Maldives", 3.2, 73.0),
    c("mw", "Malawi", -13.5, 34.0),
    c("mx", "Mexico", 23.0, -102.0),
    c("my", "Malaysia", 2.5, 112.5),
    c("mz", "Mozambique", -18.3, 35.0),
    c("na", "Namibia", -22.0, 17.0),
    c("ne", "Niger", 16.0, 8.0),
    c("ng", "Nigeria", 10.0, 8.0),
    c("ni", "Nicaragua", 13.0, -85.0),
    c("nl", "Netherlands", 52.5, 5.8),
    c("no", "Norway", 62.0, 10.0),
    c("np", "Nepal", 28.0, 84.0),
    c("nz", "New Zealand", -41.0, 174.0),
    c("om", "Oman", 21.0, 57.0),
    c("pa", "Panama", 9.0, -80.0),
    c("pe", "Peru", -10.0, -76.0),
    c("pg", "Papua New Guinea", -6.0, 147.0),
    c("ph", "Philippines", 13.0, 122.0),
    c("pk", "Pakistan", 30.0, 70.0),
    c("pl", "Poland", 52.0, 20.0),
    c("pr", "Puerto Rico", 18.2, -66.5),
    c("ps", "Palestine, State of", 32.0, 35.25),
    c("pt", "Portugal", 39.5, -8.0),
    c("py", "Paraguay", -23.0, -58.0),
    c("re", "Reunion", -21.1, 55.6),
    c("ro", "Romania", 46.0, 25.0),
    c("rs", "Serbia", 44.0, 21.0),
    c("ru", "Russian Federation", 60.0, 100.0),
    c("rw", "Rwanda", -2.0, 30.0),
    c("sa", "Saudi Arabia", 25.0, 45.0),
    c("sc", "Seychelles", -4.6, 55.7),
    c("sd", "Sudan", 15.0, 30.0),
    c("se", "Sweden", 62.0, 15.0),
    c("sg", "Singapore", 1.4, 103.8),
    c("sh", "Saint Helena, Ascension and Tristan da Cunha", -15.9, -5.7),
    c("si", "Slovenia", 46.1, 14.8),
    c("sk", "Slovakia", 48.7, 19.5),
    c("sl", "Sierra Leone", 8.5, -11.5),
    c("sm", "San Marino", 43.9, 12.4),
    c("sn", "Senegal", 14.0, -14.0),
    c("so", "Somalia", 10.0, 49.0),
    c("sr", "Suriname", 4.0, -56.0),
    c("st", "Sao Tome and Principe", 1.0, 7.0),
    c("sv", "El Salvador", 13.8, -88.9),
    c("sy", "Syrian Arab Republic", 35.0, 38.0),
    c("sz", "Swaziland", -26.5, 31.5),
    c("td", "Chad", 15.0, 19.0),
    c("tg", "Togo", 8.0, 1.2),
    c("th", "Thailand", 15.0, 100.0),
    c("tj", "Tajikistan", 39.0, 71.0),
    c("tl", "Timor-Leste", -8.8, 125.9),
    c("tm", "Turkmenistan", 40.0, 60.0),
    c("tn", "Tunisia", 34.0, 9.0),
    c("tr", "Turkey", 39.0, 35.0),
    c("tw", "Taiwan (Republic of China)", 23.5, 121.0),
    c("tz", "Tanzania, United Republic of", -6.0, 35.0),
    c("ua", "Ukraine", 49.0, 32.0),
    c("ug", "Uganda", 1.0, 32.0),
    c("us", "United States", 38.0, -97.0),
    c("uy", "Uruguay", -33.0, -56.0),
    c("uz", "Uzbekistan", 41.0, 64.0),
    c("va", "Holy See (Vatican City State)", 41.9, 12.45),
    c("ve", "Venezuela, Bolivarian Republic of", 8.0, -66.0),
    c("vn", "Viet Nam", 16.0, 106.0),
    c("ye", "Yemen", 15.0, 48.0),
    c("yt", "Mayotte", -12.8, 45.2),
    c("za", "South Africa", -29.0, 24.0),
    c("zm", "Zambia", -15.0, 30.0),
    c("zw", "Zimbabwe", -20.0, 30.0),
];

static BY_CODE: Lazy<HashMap<&'static str, &'static Country>> =
    Lazy::new(|| COUNTRIES.iter().map(|c| (c.code, c)).collect());

const WIDTH: u32 = 1000;
const HEIGHT: u32 = 560;
const MAP_TOP: f64 = 60.0;
const MAP_HEIGHT: f64 = 440.0;
const MARKER_RADIUS: f64 = 5.0;
const NO_DATA_FILL: &str = "#d9d9d9";
const RAMP: ColorRamp = ColorRamp {
    low: (0xfe, 0xe8, 0xc8),
    high: (0xb3, 0x00, 0x00),
};

/// World choropleth on an equirectangular canvas. Regions are the countries in
/// [`COUNTRIES`], keyed by lower-case alpha-2 code.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorldMap;

impl WorldMap {
    pub fn new() -> Self {
        Self
    }

    fn project(lat: f64, lon: f64) -> (f64, f64) {
        let x = (lon + 180.0) / 360.0 * WIDTH as f64;
        let y = MAP_TOP + (90.0 - lat) / 180.0 * MAP_HEIGHT;
        (x, y)
    }
}

impl RegionMap for WorldMap {
    fn recognizes(&self, code: &str) -> bool {
        BY_CODE.contains_key(code)
    }

    fn render(&self, chart: &Choropleth<'_>) -> Result<String> {
        let mut doc = SvgDocument::new(WIDTH, HEIGHT)?;
        doc.rect(0.0, 0.0, WIDTH as f64, HEIGHT as f64, "#ffffff")?;
        doc.rect(0.0, MAP_TOP, WIDTH as f64, MAP_HEIGHT, "#eef4fb")?;
        doc.text(WIDTH as f64 / 2.0, 35.0, 22, "middle", chart.title)?;

        // graticule every 30 degrees
        for step in 0..=12 {
            let (x, _) = Self::project(0.0, -180.0 + 30.0 * step as f64);
            doc.line(x, MAP_TOP, x, MAP_TOP + MAP_HEIGHT, "#c8d6e5")?;
        }
        for step in 0..=6 {
            let (_, y) = Self::project(90.0 - 30.0 * step as f64, 0.0);
            doc.line(0.0, y, WIDTH as f64, y, "#c8d6e5")?;
        }

        let min = chart.values.values().copied().min().unwrap_or(0);
        let max = chart.values.values().copied().max().unwrap_or(0);

        for country in COUNTRIES {
            let (x, y) = Self::project(country.lat, country.lon);
            let (fill, tooltip) = match chart.values.get(country.code) {
                Some(&value) => (
                    RAMP.shade(value, min, max),
                    format!("{}: {}", country.name, value),
                ),
                None => (NO_DATA_FILL.to_string(), country.name.to_string()),
            };
            doc.marker(country.code, x, y, MARKER_RADIUS, &fill, &tooltip)?;
        }

        let unknown = chart
            .values
            .keys()
            .filter(|k| !self.recognizes(k))
            .count();
        if unknown > 0 {
            debug!(unknown, "values without a map region were not drawn");
        }

        // legend
        let legend_y = MAP_TOP + MAP_HEIGHT + 30.0;
        doc.rect(20.0, legend_y - 12.0, 14.0, 14.0, &RAMP.shade(max, min, max))?;
        doc.text(40.0, legend_y, 14, "start", &chart.label)?;
        if !chart.values.is_empty() {
            doc.text(
                WIDTH as f64 - 20.0,
                legend_y,
                12,
                "end",
                &format!("{} – {}", min, max),
            )?;
        }
        doc.rect(20.0, legend_y + 8.0, 14.0, 14.0, NO_DATA_FILL)?;
        doc.text(40.0, legend_y + 20.0, 12, "start", "no data")?;

        doc.finish()
    }
}
