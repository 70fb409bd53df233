use twilight_model::channel::message::embed::Embed;
use twilight_util::builder::embed::{EmbedBuilder, EmbedFieldBuilder};

pub const BLUE: u32 = 0x1f_99_d8;
pub const GREEN: u32 = 0x00_cc_78;
pub const RED: u32 = 0xef_4b_3d;
pub const GRAY: u32 = 0x97_9c_9f;

/// Default embed color used across the bot UI.
pub const DEFAULT_EMBED_COLOR: u32 = BLUE;

/// Character budget of the embed description page.
pub const DESCRIPTION_PAGE_LIMIT: usize = 2048;
/// Character budget of every page after the first (one embed field each).
pub const FIELD_PAGE_LIMIT: usize = 1000;

/// Field name rendered as nothing, so overflow pages read as one list.
const BLANK_FIELD_NAME: &str = "\u{200B}";

/// Parse a hex color such as `ff8800` or `#ff8800`.
pub fn parse_color(raw: &str) -> anyhow::Result<u32> {
    let digits = raw.trim().trim_start_matches('#');

    match u32::from_str_radix(digits, 16) {
        Ok(color) if !digits.is_empty() && color <= 0xff_ff_ff => Ok(color),
        _ => anyhow::bail!("invalid color string '{raw}'"),
    }
}

/// Greedily pack `chunks` into pages whose length stays under the per-page limit.
///
/// A page only rolls over when it already holds something, so a single
/// chunk longer than the limit still gets a page of its own.
pub fn join_pages<I, S>(chunks: I, limit_for_page: impl Fn(usize) -> usize) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut pages = Vec::new();
    let mut page = String::new();
    let mut page_len = 0_usize;

    for chunk in chunks {
        let chunk = chunk.as_ref();
        let chunk_len = chunk.chars().count();
        let limit = limit_for_page(pages.len());

        if page_len > 0 && page_len + chunk_len > limit {
            pages.push(std::mem::take(&mut page));
            page_len = 0;
        }

        page.push_str(chunk);
        page_len += chunk_len;
    }

    if !page.is_empty() {
        pages.push(page);
    }

    pages
}

fn line_page_limit(page: usize) -> usize {
    if page == 0 {
        DESCRIPTION_PAGE_LIMIT
    } else {
        FIELD_PAGE_LIMIT
    }
}

/// Lay out `lines` over the description and as many blank-named fields as needed.
pub fn simple_line_content<I, S>(builder: EmbedBuilder, lines: I) -> EmbedBuilder
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let with_endings = lines.into_iter().map(|line| format!("{}\n", line.as_ref()));
    let mut pages = join_pages(with_endings, line_page_limit).into_iter();

    let Some(first) = pages.next() else {
        return builder;
    };

    pages.fold(builder.description(first), |builder, page| {
        builder.field(EmbedFieldBuilder::new(BLANK_FIELD_NAME, page))
    })
}

/// Build a validated embed listing `lines` under `title`.
pub fn build_line_embed<I, S>(title: &str, lines: I) -> anyhow::Result<Embed>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let builder = EmbedBuilder::new().title(title).color(DEFAULT_EMBED_COLOR);
    let embed = simple_line_content(builder, lines).validate()?.build();

    Ok(embed)
}
