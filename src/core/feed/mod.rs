use std::io;
use std::string::FromUtf8Error;

use chrono::{DateTime, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::core::scholar::types::Record;

pub const GENERATOR_NAME: &str = "scholar-rss";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelMeta {
    pub title: String,
    pub link: String,
    pub description: String,
    pub language: String,
}

#[derive(Debug, thiserror::Error)]
pub enum FeedRenderError {
    #[error("failed to write feed xml: {0}")]
    Write(#[from] io::Error),
    #[error("feed xml is not valid utf-8: {0}")]
    Encoding(#[from] FromUtf8Error),
}

pub fn render_rss(
    channel: &ChannelMeta,
    records: &[Record],
    generated_at: DateTime<Utc>,
) -> Result<String, FeedRenderError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    let timestamp = generated_at.to_rfc2822();

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut rss_start = BytesStart::new("rss");
    rss_start.push_attribute(("version", "2.0"));
    writer.write_event(Event::Start(rss_start))?;
    writer.write_event(Event::Start(BytesStart::new("channel")))?;

    write_text_element(&mut writer, "title", &channel.title)?;
    write_text_element(&mut writer, "link", &channel.link)?;
    write_text_element(&mut writer, "description", &channel.description)?;
    write_text_element(&mut writer, "language", &channel.language)?;
    write_text_element(&mut writer, "lastBuildDate", &timestamp)?;
    write_text_element(&mut writer, "generator", GENERATOR_NAME)?;

    for record in records {
        writer.write_event(Event::Start(BytesStart::new("item")))?;
        write_text_element(&mut writer, "title", &record.title)?;
        write_text_element(&mut writer, "link", &record.url)?;
        write_text_element(&mut writer, "description", &record.abstract_text)?;
        write_text_element(&mut writer, "author", &record.authors)?;
        write_text_element(&mut writer, "pubDate", &timestamp)?;
        writer.write_event(Event::End(BytesEnd::new("item")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("channel")))?;
    writer.write_event(Event::End(BytesEnd::new("rss")))?;

    Ok(String::from_utf8(writer.into_inner())?)
}

fn write_text_element<W: io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    value: &str,
) -> io::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(value)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}
