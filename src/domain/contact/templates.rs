use super::models::ContactMessage;
use crate::domain::mail::{
    models::{Brand, EmailMessage},
    templates::{banner, escape_html, escape_multiline, layout},
};

const ACCENT: &str = "#8B4513";

fn detail_row(label: &str, value: &str) -> String {
    format!(
        r#"        <tr>
          <td style="padding: 8px 0; font-weight: bold; width: 120px;">{label}:</td>
          <td style="padding: 8px 0;">{value}</td>
        </tr>"#
    )
}

/// Notification sent to the company inbox.
pub fn admin_notification(brand: &Brand, contact: &ContactMessage) -> EmailMessage {
    let email = escape_html(contact.email.as_str());
    let mut rows = vec![
        detail_row("Name", &escape_html(&contact.name)),
        detail_row(
            "Email",
            &format!(r#"<a href="mailto:{email}" style="color: {ACCENT};">{email}</a>"#),
        ),
    ];
    if let Some(phone) = &contact.phone {
        let phone = escape_html(phone);
        rows.push(detail_row(
            "Phone",
            &format!(r#"<a href="tel:{phone}" style="color: {ACCENT};">{phone}</a>"#),
        ));
    }
    if let Some(company) = &contact.company {
        rows.push(detail_row("Company", &escape_html(company)));
    }
    if let Some(subject) = &contact.subject {
        rows.push(detail_row("Subject", &escape_html(subject)));
    }

    let body = format!(
        r#"{banner}
    <div style="background: #f9f9f9; padding: 30px; border-radius: 0 0 10px 10px;">
      <h2 style="color: {ACCENT}; margin-top: 0;">Contact Details</h2>
      <table style="width: 100%; border-collapse: collapse;">
{rows}
      </table>
      <h3 style="color: {ACCENT}; margin-top: 30px;">Message</h3>
      <div style="background: white; padding: 20px; border-radius: 5px; border-left: 4px solid {ACCENT};">
        {message}
      </div>
      <hr style="border: none; border-top: 1px solid #ddd; margin: 30px 0;">
      <p style="font-size: 12px; color: #999; text-align: center;">
        This message was sent from the {brand_name} contact form<br>
        <a href="{app_url}" style="color: {ACCENT};">{app_url}</a>
      </p>
    </div>"#,
        banner = banner("New Contact Form Submission"),
        rows = rows.join("\n"),
        message = escape_multiline(&contact.message),
        brand_name = escape_html(&brand.name),
        app_url = escape_html(brand.app_url()),
    );

    let mut details = vec![
        format!("Name: {}", contact.name),
        format!("Email: {}", contact.email),
    ];
    if let Some(phone) = &contact.phone {
        details.push(format!("Phone: {}", phone));
    }
    if let Some(company) = &contact.company {
        details.push(format!("Company: {}", company));
    }
    if let Some(subject) = &contact.subject {
        details.push(format!("Subject: {}", subject));
    }
    let text = format!(
        "New Contact Form Submission\n\n\
         Contact Details:\n{details}\n\n\
         Message:\n{message}\n\n\
         ---\n\
         This message was sent from the {brand_name} contact form\n\
         {app_url}\n",
        details = details.join("\n"),
        message = contact.message,
        brand_name = brand.name,
        app_url = brand.app_url(),
    );

    EmailMessage {
        subject: format!("Contact Form: {}", contact.subject()),
        html: layout("New Contact Form Submission", &body),
        text,
    }
}

/// Acknowledgement sent back to the submitter.
pub fn confirmation(brand: &Brand, contact: &ContactMessage) -> EmailMessage {
    let phone = escape_html(&brand.phone);
    let contact_email = escape_html(&brand.contact_email);
    let app_url = escape_html(brand.app_url());

    let body = format!(
        r#"{banner}
    <div style="background: #f9f9f9; padding: 30px; border-radius: 0 0 10px 10px;">
      <h2 style="color: {ACCENT}; margin-top: 0;">Hello {name},</h2>
      <p>Thank you for reaching out to {legal}. We have received your message and will get back to you as soon as possible.</p>
      <div style="background: white; padding: 20px; border-radius: 5px; border-left: 4px solid {ACCENT}; margin: 20px 0;">
        <h3 style="color: {ACCENT}; margin-top: 0;">Your Message Summary:</h3>
        <p><strong>Subject:</strong> {subject}</p>
        <p><strong>Message:</strong></p>
        <p style="background: #f5f5f5; padding: 15px; border-radius: 3px; font-style: italic;">"{message}"</p>
      </div>
      <h3 style="color: {ACCENT};">What happens next?</h3>
      <ul style="color: #666;">
        <li>Our team will review your inquiry within 24 hours during business days</li>
        <li>We'll respond with detailed information about our services</li>
        <li>If you have urgent needs, feel free to call us at <a href="tel:{phone}" style="color: {ACCENT};">{phone}</a></li>
      </ul>
      <div style="text-align: center; margin: 30px 0;">
        <a href="{app_url}" style="background: {ACCENT}; color: white; padding: 12px 24px; text-decoration: none; border-radius: 5px; font-weight: bold;">Visit Our Website</a>
      </div>
      <hr style="border: none; border-top: 1px solid #ddd; margin: 30px 0;">
      <p style="font-size: 12px; color: #999; text-align: center;">
        {legal}<br>
        {street}, {city}<br>
        Phone: <a href="tel:{phone}" style="color: {ACCENT};">{phone}</a> |
        Email: <a href="mailto:{contact_email}" style="color: {ACCENT};">{contact_email}</a>
      </p>
    </div>"#,
        banner = banner("Thank You for Contacting Us!"),
        name = escape_html(&contact.name),
        legal = escape_html(&brand.legal_name),
        subject = escape_html(contact.subject()),
        message = escape_multiline(&contact.message),
        street = escape_html(&brand.address_street),
        city = escape_html(&brand.address_city),
    );

    let text = format!(
        "Thank You for Contacting {brand_name}!\n\n\
         Hello {name},\n\n\
         Thank you for reaching out to {legal}. We have received your message and will get back to you as soon as possible.\n\n\
         Your Message Summary:\n\
         Subject: {subject}\n\
         Message: \"{message}\"\n\n\
         What happens next?\n\
         - Our team will review your inquiry within 24 hours during business days\n\
         - We'll respond with detailed information about our services\n\
         - If you have urgent needs, feel free to call us at {phone}\n\n\
         Visit our website: {app_url}\n\n\
         ---\n\
         {legal}\n\
         {street}, {city}\n\
         Phone: {phone} | Email: {contact_email}\n",
        brand_name = brand.name,
        name = contact.name,
        legal = brand.legal_name,
        subject = contact.subject(),
        message = contact.message,
        phone = brand.phone,
        app_url = brand.app_url(),
        street = brand.address_street,
        city = brand.address_city,
        contact_email = brand.contact_email,
    );

    EmailMessage {
        subject: format!("Thank You for Contacting {}", brand.name),
        html: layout(&format!("Thank You - {}", brand.name), &body),
        text,
    }
}
