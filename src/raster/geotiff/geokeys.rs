/*
This code is part of the fastws watershed delineation library.
License: MIT
*/

/// Minimal GeoKey directory handling: enough to round-trip the EPSG code of
/// a single-CRS raster. The directory is the u16 payload of TIFF tag 34735,
/// a 4-value header followed by 4-value key entries.
pub struct GeoKeys {
    pub key_directory: Vec<u16>,
}

const GT_MODEL_TYPE_GEO_KEY: u16 = 1024;
const GT_RASTER_TYPE_GEO_KEY: u16 = 1025;
const GEOGRAPHIC_TYPE_GEO_KEY: u16 = 2048;
const PROJECTED_CS_TYPE_GEO_KEY: u16 = 3072;

const MODEL_TYPE_PROJECTED: u16 = 1;
const MODEL_TYPE_GEOGRAPHIC: u16 = 2;
const RASTER_PIXEL_IS_AREA: u16 = 1;

impl GeoKeys {
    pub fn from_tag_data(key_directory: Vec<u16>) -> GeoKeys {
        GeoKeys { key_directory }
    }

    /// The EPSG code carried by the directory: the projected CS key when
    /// present, otherwise the geographic CS key, otherwise 0.
    pub fn epsg_code(&self) -> u16 {
        if self.key_directory.len() < 4 {
            return 0;
        }
        let num_keys = self.key_directory[3] as usize;
        let mut geographic = 0u16;
        for k in 0..num_keys {
            let entry = 4 + k * 4;
            if entry + 3 >= self.key_directory.len() {
                break;
            }
            let key_id = self.key_directory[entry];
            let location = self.key_directory[entry + 1];
            let value = self.key_directory[entry + 3];
            // only short values stored inline in the directory are relevant
            if location != 0 {
                continue;
            }
            if key_id == PROJECTED_CS_TYPE_GEO_KEY && value > 0 && value < 32767 {
                return value;
            }
            if key_id == GEOGRAPHIC_TYPE_GEO_KEY {
                geographic = value;
            }
        }
        geographic
    }

    /// Builds a directory declaring the given EPSG code. Codes in the
    /// geographic range (4000..5000) are written as a geographic CRS,
    /// anything else as a projected one.
    pub fn build(epsg_code: u16) -> Vec<u16> {
        let geographic = epsg_code >= 4000 && epsg_code < 5000;
        let (model_type, cs_key) = if geographic {
            (MODEL_TYPE_GEOGRAPHIC, GEOGRAPHIC_TYPE_GEO_KEY)
        } else {
            (MODEL_TYPE_PROJECTED, PROJECTED_CS_TYPE_GEO_KEY)
        };
        vec![
            1, 1, 0, 3, // KeyDirectoryVersion, KeyRevision, MinorRevision, NumberOfKeys
            GT_MODEL_TYPE_GEO_KEY, 0, 1, model_type,
            GT_RASTER_TYPE_GEO_KEY, 0, 1, RASTER_PIXEL_IS_AREA,
            cs_key, 0, 1, epsg_code,
        ]
    }
}

#[cfg(test)]
mod test {
    use super::GeoKeys;

    #[test]
    fn test_epsg_round_trip() {
        for code in [4326u16, 32611, 3857, 26917] {
            let keys = GeoKeys::from_tag_data(GeoKeys::build(code));
            assert_eq!(keys.epsg_code(), code);
        }
    }

    #[test]
    fn test_empty_directory() {
        let keys = GeoKeys::from_tag_data(vec![]);
        assert_eq!(keys.epsg_code(), 0);
    }
}
