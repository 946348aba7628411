//! Branded bodies for the transactional emails.
//!
//! Every template yields both an HTML and a plain-text rendering. Values
//! coming from users are escaped before they reach the HTML body.

use reqwest::Url;

use super::models::{Brand, EmailMessage};
use crate::domain::subscription::models::{email::SubscriberEmail, name::SubscriberName};

const HEADER_GRADIENT: &str = "background: linear-gradient(135deg, #8B4513, #7CB342)";
const ACCENT: &str = "#8B4513";

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Escapes `raw` and keeps its line breaks visible in HTML.
pub fn escape_multiline(raw: &str) -> String {
    escape_html(raw).replace('\n', "<br>")
}

/// `{app_url}/unsubscribe?email=<recipient>` with the address form-encoded.
pub fn unsubscribe_link(brand: &Brand, recipient: &SubscriberEmail) -> String {
    let base = format!("{}/unsubscribe", brand.app_url());
    match Url::parse(&base) {
        Ok(mut url) => {
            url.query_pairs_mut().append_pair("email", recipient.as_str());
            url.to_string()
        }
        Err(_) => format!("{}?email={}", base, recipient.as_str()),
    }
}

/// Wraps a body fragment in the shared document chrome.
pub fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
  </head>
  <body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px;">
{body}
  </body>
</html>"#,
        title = escape_html(title),
        body = body,
    )
}

pub fn banner(headline: &str) -> String {
    format!(
        r#"    <div style="{HEADER_GRADIENT}; padding: 30px; text-align: center; border-radius: 10px 10px 0 0;">
      <h1 style="color: white; margin: 0; font-size: 28px;">{}</h1>
    </div>"#,
        escape_html(headline)
    )
}

pub fn welcome_subject(brand: &Brand) -> String {
    format!("Welcome to {} Newsletter!", brand.name)
}

pub fn unsubscribe_subject(brand: &Brand) -> String {
    format!("You have been unsubscribed from {} Newsletter", brand.name)
}

pub fn welcome(
    brand: &Brand,
    to: &SubscriberEmail,
    first_name: Option<&SubscriberName>,
) -> EmailMessage {
    let greeting_name = first_name
        .map(|n| n.as_str().to_string())
        .unwrap_or_else(|| "Valued Customer".to_string());
    let unsubscribe = unsubscribe_link(brand, to);
    let app_url = brand.app_url();

    let body = format!(
        r#"{banner}
    <div style="background: #f9f9f9; padding: 30px; border-radius: 0 0 10px 10px;">
      <h2 style="color: {ACCENT}; margin-top: 0;">Thank you for subscribing, {name}!</h2>
      <p>We're excited to have you join our community of coffee and tea enthusiasts. You'll now receive:</p>
      <ul style="color: #666;">
        <li>Latest updates on premium coffee beans from Japan, Vietnam, and China</li>
        <li>Exclusive matcha tea insights and brewing tips</li>
        <li>Global trade market updates and industry news</li>
        <li>Special offers and early access to new products</li>
      </ul>
      <p>If you have any questions or need assistance, feel free to reach out to us at <a href="mailto:{contact}" style="color: {ACCENT};">{contact}</a>.</p>
      <hr style="border: none; border-top: 1px solid #ddd; margin: 30px 0;">
      <p style="font-size: 12px; color: #999; text-align: center;">
        {legal}<br>
        {city}<br>
        <a href="{unsubscribe}" style="color: #999;">Unsubscribe</a>
      </p>
    </div>"#,
        banner = banner(&format!("Welcome to {}!", brand.name)),
        name = escape_html(&greeting_name),
        contact = escape_html(&brand.contact_email),
        legal = escape_html(&brand.legal_name),
        city = escape_html(&brand.address_city),
        unsubscribe = escape_html(&unsubscribe),
    );

    let text = format!(
        "Welcome to {brand_name}!\n\n\
         Thank you for subscribing, {name}!\n\n\
         We're excited to have you join our community of coffee and tea enthusiasts. You'll now receive:\n\n\
         - Latest updates on premium coffee beans from Japan, Vietnam, and China\n\
         - Exclusive matcha tea insights and brewing tips\n\
         - Global trade market updates and industry news\n\
         - Special offers and early access to new products\n\n\
         If you have any questions or need assistance, feel free to reach out to us at {contact}.\n\n\
         Explore our products: {app_url}/products\n\n\
         ---\n\
         {legal}\n\
         {city}\n\
         Unsubscribe: {unsubscribe}\n",
        brand_name = brand.name,
        name = greeting_name,
        contact = brand.contact_email,
        app_url = app_url,
        legal = brand.legal_name,
        city = brand.address_city,
        unsubscribe = unsubscribe,
    );

    EmailMessage {
        subject: welcome_subject(brand),
        html: layout(&format!("Welcome to {}", brand.name), &body),
        text,
    }
}

pub fn unsubscribe_confirmation(brand: &Brand) -> EmailMessage {
    let resubscribe = format!("{}/newsletter", brand.app_url());

    let body = format!(
        r#"    <div style="background: #f9f9f9; padding: 30px; border-radius: 10px; text-align: center;">
      <h1 style="color: {ACCENT}; margin-top: 0;">You've been unsubscribed</h1>
      <p>We're sorry to see you go! You have been successfully unsubscribed from our newsletter.</p>
      <p>If this was a mistake, you can always <a href="{resubscribe}" style="color: {ACCENT};">resubscribe here</a>.</p>
      <p>Thank you for being part of our community.</p>
      <hr style="border: none; border-top: 1px solid #ddd; margin: 30px 0;">
      <p style="font-size: 12px; color: #999;">
        {legal}<br>
        {city}
      </p>
    </div>"#,
        resubscribe = escape_html(&resubscribe),
        legal = escape_html(&brand.legal_name),
        city = escape_html(&brand.address_city),
    );

    let text = format!(
        "You've been unsubscribed\n\n\
         We're sorry to see you go! You have been successfully unsubscribed from our newsletter.\n\n\
         If this was a mistake, you can always resubscribe here: {resubscribe}\n\n\
         Thank you for being part of our community.\n\n\
         ---\n\
         {legal}\n\
         {city}\n",
        resubscribe = resubscribe,
        legal = brand.legal_name,
        city = brand.address_city,
    );

    EmailMessage {
        subject: unsubscribe_subject(brand),
        html: layout(&format!("Unsubscribed - {}", brand.name), &body),
        text,
    }
}
