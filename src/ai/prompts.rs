//! Instruction text sent to the model for each formatting mode.
//!
//! Keeping the wording here makes it easy to tune listing rules without
//! touching the request plumbing.

use crate::config::PromptConfig;

const PIPE_FORMAT: &str = "Name | Price | Description | URLs | Sizes";

/// Instructions for the HTTP endpoint's default listing format.
pub fn product_prompt(cfg: &PromptConfig) -> String {
    format!(
        "You are a product listing formatter. Convert the user's product details into exactly this format:\n\
         {PIPE_FORMAT}\n\n\
         Title: '1 pc {brand} <Product Type> <Fabric>'. Never put sizes in the title. \
         Detect the product type (shirt, tshirt, top, kurta, pants). Fabric is Cotton or Pure Cotton.\n\
         Price: increase the given price by {markup}% and round to a whole number.\n\
         Description: a few lines, never mention price or sizes.\n\
         Sizes: 36,38,40 for pants, otherwise M,L,XL,XXL.\n\
         Output a single pipe-separated line and nothing else.",
        brand = cfg.brand,
        markup = cfg.product_markup_percent,
    )
}

/// Instructions for a single-piece listing line.
pub fn single_prompt(cfg: &PromptConfig) -> String {
    format!(
        "You are an e-commerce catalog specialist. Convert the user's product details into ONE line:\n\
         {PIPE_FORMAT}\n\n\
         Use only the single-piece offer and ignore combo or bulk offers.\n\
         Name: '1 pc <Brand> <Product Type> <Fabric>'.\n\
         Price: the single-piece price increased by {markup}%, rounded, digits only.\n\
         Description: 2-3 short customer-friendly lines without prices, currency, shipping, offers, emojis, hashtags or sizes.\n\
         URLs: only image or video links, comma-separated without spaces.\n\
         Sizes: every size as its own value, so 'M38 L40' becomes 'M,38,L,40'.\n\
         No headings, markdown, quotes or explanations.",
        markup = cfg.markup_percent,
    )
}

/// Instructions for a combo-pack listing line.
pub fn combo_prompt(cfg: &PromptConfig) -> String {
    format!(
        "You are an e-commerce catalog specialist. Convert the user's product details into ONE line:\n\
         {PIPE_FORMAT}\n\n\
         Use only the combo or pack offer.\n\
         Name: '<Quantity> pcs COMBO <Brand> <Product Type> <Fabric>'.\n\
         Price: the combo price increased by {markup}%, rounded, digits only.\n\
         Description: 2-3 short premium lines that include exactly one sentence \
         'Single piece also available at ₹<single price + {markup}%>' and no other prices.\n\
         URLs: only image or video links, comma-separated without spaces.\n\
         Sizes: comma-separated such as M,L,XL,XXL; infer standard sizing when missing.\n\
         No headings, markdown, quotes or commentary.",
        markup = cfg.markup_percent,
    )
}

/// Instructions for an Instagram caption.
pub const INSTAGRAM_PROMPT: &str = "You are an Instagram fashion copywriter. \
Write a sales-focused caption for the product the user describes.\n\
Open with a strong hook, use a few relevant emojis, highlight fabric, quality, price, sizes and colours, \
add urgency when an offer applies, end with a clear call to action such as DM to order, \
and finish with 5-8 fashion hashtags. Use line breaks for readability. \
Output only the caption text without quotes or headings.";
