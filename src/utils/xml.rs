//! Small helpers over the `quick-xml` writer.

use anyhow::Result;
use quick_xml::{
    Writer,
    events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use std::io::Cursor;

pub type XmlWriter = Writer<Cursor<Vec<u8>>>;

/// Writer indenting nested elements by two spaces.
pub fn indented_writer() -> XmlWriter {
    Writer::new_with_indent(Cursor::new(Vec::with_capacity(4096)), b' ', 2)
}

/// Writer producing a single line.
pub fn compact_writer() -> XmlWriter {
    Writer::new(Cursor::new(Vec::with_capacity(1024)))
}

/// `<?xml version="1.0" encoding="UTF-8"?>`
pub fn write_declaration(writer: &mut XmlWriter) -> Result<()> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    Ok(())
}

/// Write a text element: `<tag>text</tag>`.
#[inline]
pub fn write_text_element(writer: &mut XmlWriter, tag: &str, text: &str) -> Result<()> {
    write_text_element_with_attrs(writer, tag, &[], text)
}

/// Write a text element with attributes: `<tag attr="val">text</tag>`.
pub fn write_text_element_with_attrs(
    writer: &mut XmlWriter,
    tag: &str,
    attrs: &[(&str, &str)],
    text: &str,
) -> Result<()> {
    let mut elem = BytesStart::new(tag);
    for (k, v) in attrs {
        elem.push_attribute((*k, *v));
    }
    writer.write_event(Event::Start(elem))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

/// Write an empty element with attributes: `<tag attr1="val1" ... />`.
#[inline]
pub fn write_empty_elem(writer: &mut XmlWriter, tag: &str, attrs: &[(&str, &str)]) -> Result<()> {
    let mut elem = BytesStart::new(tag);
    for (k, v) in attrs {
        elem.push_attribute((*k, *v));
    }
    writer.write_event(Event::Empty(elem))?;
    Ok(())
}

/// Write `text` as CDATA: `<tag><![CDATA[text]]></tag>`.
///
/// A `]]>` inside `text` is split across two adjacent sections so the
/// element stays well-formed and decodes back to the original text.
pub fn write_cdata_element(writer: &mut XmlWriter, tag: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    for section in cdata_sections(text) {
        writer.write_event(Event::CData(BytesCData::new(section)))?;
    }
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

/// Split `text` so no section contains `]]>`.
///
/// `a]]>b` becomes `["a]]", ">b"]`.
pub fn cdata_sections(text: &str) -> Vec<&str> {
    let mut sections = Vec::with_capacity(1);
    let mut rest = text;
    while let Some(pos) = rest.find("]]>") {
        let (head, tail) = rest.split_at(pos + 2);
        sections.push(head);
        rest = tail;
    }
    sections.push(rest);
    sections
}

/// Consume the writer and return its UTF-8 output.
pub fn into_string(writer: XmlWriter) -> Result<String> {
    Ok(String::from_utf8(writer.into_inner().into_inner())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_text_element_escapes() {
        let mut writer = compact_writer();
        write_text_element(&mut writer, "title", "Tom & <Jerry>").unwrap();
        assert_eq!(
            into_string(writer).unwrap(),
            "<title>Tom &amp; &lt;Jerry&gt;</title>"
        );
    }

    #[test]
    fn test_write_empty_elem() {
        let mut writer = compact_writer();
        write_empty_elem(&mut writer, "link", &[("rel", "self"), ("href", "a?b&c")]).unwrap();
        assert_eq!(
            into_string(writer).unwrap(),
            r#"<link rel="self" href="a?b&amp;c"/>"#
        );
    }

    #[test]
    fn test_cdata_sections() {
        assert_eq!(cdata_sections("plain"), ["plain"]);
        assert_eq!(cdata_sections(""), [""]);
        assert_eq!(cdata_sections("a]]>b"), ["a]]", ">b"]);
        assert_eq!(cdata_sections("]]>]]>"), ["]]", ">]]", ">"]);
    }

    #[test]
    fn test_cdata_sections_rejoin() {
        let text = "x ]]> y ]] z ]]>";
        assert_eq!(cdata_sections(text).concat(), text);
        for section in cdata_sections(text) {
            assert!(!section.contains("]]>"));
        }
    }

    #[test]
    fn test_write_cdata_element_split() {
        let mut writer = compact_writer();
        write_cdata_element(&mut writer, "description", "a]]>b <i>").unwrap();
        assert_eq!(
            into_string(writer).unwrap(),
            "<description><![CDATA[a]]]]><![CDATA[>b <i>]]></description>"
        );
    }

    #[test]
    fn test_declaration() {
        let mut writer = compact_writer();
        write_declaration(&mut writer).unwrap();
        assert_eq!(
            into_string(writer).unwrap(),
            r#"<?xml version="1.0" encoding="UTF-8"?>"#
        );
    }
}
