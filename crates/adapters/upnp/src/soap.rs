//! SOAP envelopes for `RenderingControl` and extraction of response values.

use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::Event;

/// Service type of the UPnP `RenderingControl:1` service.
pub const RENDERING_CONTROL_URN: &str = "urn:schemas-upnp-org:service:RenderingControl:1";

const SOAP_ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
const SOAP_ENCODING: &str = "http://schemas.xmlsoap.org/soap/encoding/";

/// Value of the `SOAPACTION` header for `action`.
#[must_use]
pub fn soap_action(action: &str) -> String {
    format!("\"{RENDERING_CONTROL_URN}#{action}\"")
}

/// Wrap `action` and its arguments in a SOAP envelope.
#[must_use]
pub fn envelope(action: &str, arguments: &[(&str, String)]) -> String {
    let body: String = arguments
        .iter()
        .map(|(name, value)| format!("<{name}>{}</{name}>", escape(value.as_str())))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<s:Envelope xmlns:s="{SOAP_ENVELOPE_NS}" s:encodingStyle="{SOAP_ENCODING}">
  <s:Body>
    <u:{action} xmlns:u="{RENDERING_CONTROL_URN}">{body}</u:{action}>
  </s:Body>
</s:Envelope>"#
    )
}

/// Text of the first element named `element`, ignoring namespace prefixes.
///
/// Returns `None` when the element is missing, empty, or the document stops
/// parsing before it is reached.
#[must_use]
pub fn extract_text(xml: &str, element: &str) -> Option<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut inside = false;
    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                inside = start.local_name().as_ref() == element.as_bytes();
            }
            Ok(Event::Text(text)) if inside => {
                return text.unescape().ok().map(|value| value.into_owned());
            }
            Ok(Event::End(_)) => {
                if inside {
                    return None;
                }
            }
            Ok(Event::Eof) | Err(_) => return None,
            Ok(_) => {}
        }
    }
}

/// `CurrentVolume` of a `GetVolume` response, 0 when absent or malformed.
#[must_use]
pub fn current_volume(xml: &str) -> i64 {
    extract_text(xml, "CurrentVolume")
        .and_then(|text| text.trim().parse().ok())
        .unwrap_or(0)
}

/// `CurrentMute` of a `GetMute` response, false when absent or malformed.
#[must_use]
pub fn current_mute(xml: &str) -> bool {
    extract_text(xml, "CurrentMute").is_some_and(|text| {
        let text = text.trim();
        text == "1" || text.eq_ignore_ascii_case("true")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(action: &str, inner: &str) -> String {
        format!(
            r#"<?xml version="1.0"?>
<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/">
  <s:Body>
    <u:{action}Response xmlns:u="{RENDERING_CONTROL_URN}">
      {inner}
    </u:{action}Response>
  </s:Body>
</s:Envelope>"#
        )
    }

    #[test]
    fn should_wrap_arguments_in_action_element() {
        let xml = envelope(
            "SetVolume",
            &[
                ("InstanceID", "0".to_string()),
                ("Channel", "Master".to_string()),
                ("DesiredVolume", "42".to_string()),
            ],
        );

        assert!(xml.contains(
            r#"<u:SetVolume xmlns:u="urn:schemas-upnp-org:service:RenderingControl:1"><InstanceID>0</InstanceID><Channel>Master</Channel><DesiredVolume>42</DesiredVolume></u:SetVolume>"#
        ));
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="utf-8"?>"#));
    }

    #[test]
    fn should_escape_argument_values() {
        let xml = envelope("SetVolume", &[("Channel", "L&R".to_string())]);
        assert!(xml.contains("<Channel>L&amp;R</Channel>"));
    }

    #[test]
    fn should_quote_soap_action() {
        assert_eq!(
            soap_action("GetMute"),
            "\"urn:schemas-upnp-org:service:RenderingControl:1#GetMute\""
        );
    }

    #[test]
    fn should_read_volume() {
        let xml = response("GetVolume", "<CurrentVolume>37</CurrentVolume>");
        assert_eq!(current_volume(&xml), 37);
    }

    #[test]
    fn should_ignore_namespace_prefix() {
        let xml = response("GetVolume", "<u:CurrentVolume>12</u:CurrentVolume>");
        assert_eq!(current_volume(&xml), 12);
    }

    #[test]
    fn should_default_volume_when_absent_or_malformed() {
        assert_eq!(current_volume(&response("GetVolume", "")), 0);
        assert_eq!(
            current_volume(&response("GetVolume", "<CurrentVolume>loud</CurrentVolume>")),
            0
        );
        assert_eq!(
            current_volume(&response("GetVolume", "<CurrentVolume></CurrentVolume>")),
            0
        );
        assert_eq!(current_volume("<<<not xml"), 0);
    }

    #[test]
    fn should_read_mute_flag() {
        assert!(current_mute(&response("GetMute", "<CurrentMute>1</CurrentMute>")));
        assert!(current_mute(&response("GetMute", "<CurrentMute>true</CurrentMute>")));
        assert!(!current_mute(&response("GetMute", "<CurrentMute>0</CurrentMute>")));
        assert!(!current_mute(&response("GetMute", "")));
    }
}
