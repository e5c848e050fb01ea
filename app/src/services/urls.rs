use url::Url;

/// Builds the public URLs encoded into banner QR codes
///
/// QR codes must carry fully qualified URLs, so the builder holds the
/// configured public base URL of the deployment
#[derive(Clone)]
pub struct UrlBuilder {
    base: Url,
}

impl UrlBuilder {
    pub fn new(base: Url) -> Self {
        Self { base }
    }

    /// public info page URL for a vehicle identifier
    pub fn vehicle_info_url(&self, identifier: &str) -> String {
        let mut url = self.base.clone();
        url.set_path(&format!("/api/veiculos/veiculo/{}/info/", identifier));
        url.to_string()
    }

    /// public download URL for a stored artifact key
    pub fn media_url(&self, key: &str) -> String {
        let mut url = self.base.clone();
        url.set_path(&format!("/media/{}", key));
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vehicle_info_urls_are_fully_qualified() {
        let builder = UrlBuilder::new(Url::parse("http://localhost:8000").unwrap());

        assert_eq!(
            builder.vehicle_info_url("AB3XY789"),
            "http://localhost:8000/api/veiculos/veiculo/AB3XY789/info/"
        );
    }

    #[test]
    fn media_urls_point_at_the_artifact_key() {
        let builder = UrlBuilder::new(Url::parse("http://localhost:8000").unwrap());

        assert_eq!(
            builder.media_url("banners_identificacao/veiculo/taxi/AB3XY789/banner_AB3XY789_ABC1234.png"),
            "http://localhost:8000/media/banners_identificacao/veiculo/taxi/AB3XY789/banner_AB3XY789_ABC1234.png"
        );
    }

    #[test]
    fn base_url_paths_are_replaced_not_appended() {
        let builder = UrlBuilder::new(Url::parse("https://transito.example.com/").unwrap());

        assert_eq!(
            builder.vehicle_info_url("XYZW2345"),
            "https://transito.example.com/api/veiculos/veiculo/XYZW2345/info/"
        );
    }
}
