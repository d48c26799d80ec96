//! Result card: district heading plus one card per representative.

use eframe::egui;
use shared::{
    domain::{District, Representative},
    protocol::LookupData,
};

pub const NO_REPRESENTATIVES_NOTE: &str = "No representatives are listed for this district yet.";

pub fn district_caption(district: &District) -> String {
    format!("Council District {}", district.number)
}

/// Title and role joined for display, skipping blanks.
pub fn representative_subtitle(rep: &Representative) -> Option<String> {
    let parts: Vec<&str> = [rep.title.as_deref(), rep.role.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();
    (!parts.is_empty()).then(|| parts.join(" · "))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactLink {
    pub label: String,
    pub url: String,
}

pub fn contact_links(rep: &Representative) -> Vec<ContactLink> {
    let mut links = Vec::new();
    if let Some(email) = rep.email.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
        links.push(ContactLink {
            label: email.to_string(),
            url: format!("mailto:{email}"),
        });
    }
    if let Some(url) = rep
        .profile_url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
    {
        links.push(ContactLink {
            label: "Profile".to_string(),
            url: url.to_string(),
        });
    }
    links
}

pub fn show(ui: &mut egui::Ui, data: &LookupData) {
    egui::Frame::group(ui.style())
        .corner_radius(10.0)
        .inner_margin(egui::Margin::symmetric(14, 12))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.weak(district_caption(&data.district));
            ui.heading(&data.district.name);
            ui.add_space(6.0);

            if data.representatives.is_empty() {
                ui.label(NO_REPRESENTATIVES_NOTE);
                return;
            }

            for rep in &data.representatives {
                show_representative(ui, rep);
            }
        });
}

fn show_representative(ui: &mut egui::Ui, rep: &Representative) {
    egui::Frame::NONE
        .fill(ui.visuals().faint_bg_color)
        .corner_radius(8.0)
        .inner_margin(egui::Margin::symmetric(10, 8))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(egui::RichText::new(&rep.name).strong().size(16.0));
            if let Some(subtitle) = representative_subtitle(rep) {
                ui.weak(subtitle);
            }
            if let Some(district) = rep.district.as_deref().filter(|d| !d.trim().is_empty()) {
                ui.small(district);
            }
            let links = contact_links(rep);
            if !links.is_empty() {
                ui.horizontal_wrapped(|ui| {
                    for link in links {
                        ui.hyperlink_to(link.label, link.url);
                    }
                });
            }
        });
    ui.add_space(4.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::DistrictNumber;

    fn jane_doe() -> Representative {
        Representative {
            name: "Jane Doe".to_string(),
            title: None,
            role: Some("Councilmember".to_string()),
            district: None,
            email: None,
            profile_url: None,
        }
    }

    #[test]
    fn caption_uses_the_district_number_verbatim() {
        let district = District {
            number: DistrictNumber::Text("Position 8".to_string()),
            name: "Citywide".to_string(),
            geometry: None,
        };
        assert_eq!(district_caption(&district), "Council District Position 8");
    }

    #[test]
    fn subtitle_joins_title_and_role() {
        assert_eq!(representative_subtitle(&jane_doe()).as_deref(), Some("Councilmember"));

        let rep = Representative {
            title: Some("Council President".to_string()),
            ..jane_doe()
        };
        assert_eq!(
            representative_subtitle(&rep).as_deref(),
            Some("Council President · Councilmember")
        );

        let rep = Representative {
            title: Some("  ".to_string()),
            role: None,
            ..jane_doe()
        };
        assert_eq!(representative_subtitle(&rep), None);
    }

    #[test]
    fn contact_links_cover_email_and_profile() {
        assert!(contact_links(&jane_doe()).is_empty());

        let rep = Representative {
            email: Some("jane.doe@seattle.gov".to_string()),
            profile_url: Some("https://seattle.gov/council/doe".to_string()),
            ..jane_doe()
        };
        assert_eq!(
            contact_links(&rep),
            vec![
                ContactLink {
                    label: "jane.doe@seattle.gov".to_string(),
                    url: "mailto:jane.doe@seattle.gov".to_string(),
                },
                ContactLink {
                    label: "Profile".to_string(),
                    url: "https://seattle.gov/council/doe".to_string(),
                },
            ]
        );
    }
}
