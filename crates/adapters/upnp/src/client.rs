//! HTTP client for the `RenderingControl` service of one renderer.

use reqwest::Client;
use reqwest::header::CONTENT_TYPE;

use crate::config::UpnpConfig;
use crate::error::UpnpError;
use crate::soap;

/// Sends `RenderingControl` actions to renderers.
#[derive(Debug, Clone)]
pub struct RenderingControlClient {
    http: Client,
    config: UpnpConfig,
}

impl RenderingControlClient {
    /// Build a client whose requests are bounded by the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns [`UpnpError::Http`] if the HTTP client cannot be initialised.
    pub fn new(config: UpnpConfig) -> Result<Self, UpnpError> {
        let http = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { http, config })
    }

    /// Control URL for a device `address` (`host` or `host:port`).
    ///
    /// # Errors
    ///
    /// Returns [`UpnpError::InvalidAddress`] when the address has no host or
    /// an unparsable port.
    pub fn control_url(&self, address: &str) -> Result<String, UpnpError> {
        let (host, port) = split_address(address, self.config.control_port)?;
        Ok(format!("http://{host}:{port}{}", self.config.control_path))
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_volume(&self, url: &str) -> Result<i64, UpnpError> {
        let body = self.call(url, "GetVolume", Vec::new()).await?;
        Ok(soap::current_volume(&body))
    }

    #[tracing::instrument(skip(self))]
    pub async fn set_volume(&self, url: &str, volume: i64) -> Result<(), UpnpError> {
        self.call(url, "SetVolume", vec![("DesiredVolume", volume.to_string())])
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_mute(&self, url: &str) -> Result<bool, UpnpError> {
        let body = self.call(url, "GetMute", Vec::new()).await?;
        Ok(soap::current_mute(&body))
    }

    #[tracing::instrument(skip(self))]
    pub async fn set_mute(&self, url: &str, mute: bool) -> Result<(), UpnpError> {
        let desired = if mute { "1" } else { "0" };
        self.call(url, "SetMute", vec![("DesiredMute", desired.to_string())])
            .await?;
        Ok(())
    }

    /// POST `action` with the standard `InstanceID`/`Channel` arguments
    /// followed by `extra`, returning the response body.
    async fn call(
        &self,
        url: &str,
        action: &str,
        extra: Vec<(&str, String)>,
    ) -> Result<String, UpnpError> {
        let mut arguments = vec![
            ("InstanceID", self.config.instance_id.to_string()),
            ("Channel", self.config.channel.clone()),
        ];
        arguments.extend(extra);

        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, r#"text/xml; charset="utf-8""#)
            .header("SOAPACTION", soap::soap_action(action))
            .body(soap::envelope(action, &arguments))
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        tracing::trace!(action, %body, "SOAP response");
        Ok(body)
    }
}

fn split_address(address: &str, default_port: u16) -> Result<(String, u16), UpnpError> {
    let invalid = || UpnpError::InvalidAddress(address.to_string());
    let parse_port = |raw: &str| raw.parse::<u16>().map_err(|_| invalid());

    let (host, port) = if let Some(rest) = address.strip_prefix('[') {
        let (host, tail) = rest.split_once(']').ok_or_else(invalid)?;
        let port = match tail {
            "" => default_port,
            _ => parse_port(tail.strip_prefix(':').ok_or_else(invalid)?)?,
        };
        (format!("[{host}]"), port)
    } else {
        match address.split_once(':') {
            Some((_, rest)) if rest.contains(':') => (format!("[{address}]"), default_port),
            Some((host, port)) => (host.to_string(), parse_port(port)?),
            None => (address.to_string(), default_port),
        }
    };

    if host.is_empty() || host == "[]" {
        return Err(invalid());
    }
    Ok((host, port))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> RenderingControlClient {
        RenderingControlClient::new(UpnpConfig::default()).unwrap()
    }

    #[test]
    fn should_use_default_port_for_bare_host() {
        assert_eq!(
            client().control_url("192.168.1.42").unwrap(),
            "http://192.168.1.42:2870/control/RenderingControl"
        );
    }

    #[test]
    fn should_use_port_carried_by_address() {
        assert_eq!(
            client().control_url("192.168.1.42:49152").unwrap(),
            "http://192.168.1.42:49152/control/RenderingControl"
        );
    }

    #[test]
    fn should_bracket_ipv6_hosts() {
        assert_eq!(
            client().control_url("fe80::1").unwrap(),
            "http://[fe80::1]:2870/control/RenderingControl"
        );
        assert_eq!(
            client().control_url("[fe80::1]:8080").unwrap(),
            "http://[fe80::1]:8080/control/RenderingControl"
        );
    }

    #[test]
    fn should_reject_unusable_addresses() {
        for address in ["", ":2870", "tv:port", "[fe80::1", "[]"] {
            assert!(
                matches!(
                    client().control_url(address),
                    Err(UpnpError::InvalidAddress(_))
                ),
                "{address} should be rejected"
            );
        }
    }
}
