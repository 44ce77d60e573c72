//! The read-only knowledge base: detail records, eras, and reference sites.
//!
//! Constructed once at startup and shared by reference; nothing in here is
//! mutated afterwards, so concurrent readers need no synchronization.

use std::collections::HashMap;

use crate::artifact_class::ArtifactClass;
use crate::detail::ArtifactDetail;
use crate::site::{ReferenceSite, builtin_sites};
use crate::timeline::{TimelineEra, builtin_eras};

/// Immutable reference tables loaded at process start.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    details: HashMap<ArtifactClass, ArtifactDetail>,
    eras: Vec<TimelineEra>,
    sites: Vec<ReferenceSite>,
    placeholder: ArtifactDetail,
}

impl KnowledgeBase {
    /// Builds the builtin knowledge base.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            details: builtin_details(),
            eras: builtin_eras(),
            sites: builtin_sites(),
            placeholder: ArtifactDetail::placeholder(),
        }
    }

    /// Looks up the detail record for a class.
    #[must_use]
    pub fn detail(&self, class: ArtifactClass) -> &ArtifactDetail {
        self.details.get(&class).unwrap_or(&self.placeholder)
    }

    /// Looks up the detail record for a raw label string.
    ///
    /// Unknown labels return the placeholder record rather than failing:
    /// the class set is closed, but report generation must never abort
    /// solely because metadata is missing.
    #[must_use]
    pub fn detail_for_label(&self, label: &str) -> &ArtifactDetail {
        label
            .parse::<ArtifactClass>()
            .map_or(&self.placeholder, |class| self.detail(class))
    }

    /// Returns the era table, ascending by start year.
    #[must_use]
    pub fn eras(&self) -> &[TimelineEra] {
        &self.eras
    }

    /// Returns the reference site table in its canonical order.
    #[must_use]
    pub fn sites(&self) -> &[ReferenceSite] {
        &self.sites
    }
}

fn detail(
    description: &str,
    era: &str,
    material: &str,
    significance: &str,
    cultural_context: Option<&str>,
    technological_markers: Option<&str>,
) -> ArtifactDetail {
    ArtifactDetail {
        description: description.to_string(),
        era: era.to_string(),
        material: material.to_string(),
        significance: significance.to_string(),
        cultural_context: cultural_context.map(str::to_string),
        technological_markers: technological_markers.map(str::to_string),
    }
}

#[expect(clippy::too_many_lines, reason = "curated reference text")]
fn builtin_details() -> HashMap<ArtifactClass, ArtifactDetail> {
    HashMap::from([
        (
            ArtifactClass::HuntingTool,
            detail(
                "Tools crafted by early humans for hunting, butchering, and processing animals. This category includes a wide range of implements such as stone spearheads, arrowheads, hand axes, and scrapers.",
                "Paleolithic to the Iron Age. The design and material changed significantly over time, reflecting technological advancements.",
                "Commonly made from durable materials like chert, flint, obsidian, and quartzite. Later examples include bone, antler, and eventually bronze or iron.",
                "These tools are crucial for understanding the subsistence strategies, cognitive abilities, and technological skills of prehistoric societies. They provide direct evidence of human interaction with the environment.",
                Some("Hunting equipment was often produced and maintained communally, and its distribution across a site can reveal task areas and seasonal camps."),
                Some("Conchoidal flake scars, retouched edges, and hafting wear distinguish worked tools from naturally broken stone."),
            ),
        ),
        (
            ArtifactClass::Kendi,
            detail(
                "A unique spouted vessel used for drinking or pouring liquids, characterized by its round body, neck, and a mammiform spout without a handle. It is a distinctive artifact of Southeast Asian ceramic traditions.",
                "Prominently from the 9th to the 19th centuries, with forms evolving across different dynasties and kingdoms.",
                "Typically earthenware or stoneware, often glazed. Some high-status examples were made from precious metals like bronze or silver.",
                "Kendis were important in daily life and ceremonial rituals. Their distribution across Asia provides evidence of extensive maritime trade networks, particularly for ceramics.",
                Some("Used in ablution and libation rites as well as at the table; spouted pouring avoided contact with the lips, important in ritual purity."),
                Some("Wheel-thrown body with a separately luted spout; glaze composition and kiln marks often identify the production centre."),
            ),
        ),
        (
            ArtifactClass::Thakli,
            detail(
                "A traditional spindle used in India for hand-spinning fibers like cotton and wool into thread. It consists of a weighted whorl attached to a shaft.",
                "Ancient to modern times. Its form has remained relatively consistent for centuries.",
                "The whorl is often made of stone, clay, or bone, while the shaft is typically wood or metal.",
                "The presence of Thakli whorls at an archaeological site is a strong indicator of textile production, a vital economic activity in ancient cultures.",
                Some("Spinning was largely household work; whorl finds cluster in domestic quarters and are frequently associated with dyeing vats."),
                Some("A centrally drilled, symmetrically weighted whorl with polish from use distinguishes a spindle whorl from a bead."),
            ),
        ),
        (
            ArtifactClass::ShellBangle,
            detail(
                "Ornaments worn on the wrist, crafted from marine or freshwater shells. They were often made from a single, continuous cross-section of a large shell.",
                "Widespread from the Neolithic period through the Iron Age and into historical periods. Particularly common in Harappan and Gangetic Valley cultures.",
                "Most commonly made from the conch shell (Turbinella pyrum). The species of shell can indicate long-distance trade with coastal regions.",
                "Shell bangles were not just ornaments but also important cultural markers, indicating social status, marital status, and ritual roles. They are evidence of sophisticated craftsmanship and trade.",
                Some("Worn in graduated sets on the forearm; in several cultures bangles were broken on widowhood, so intact burial sets mark married women."),
                Some("Saw-cut sections of the shell columella, ground and polished; cut striations and chamfered edges reveal the workshop technique."),
            ),
        ),
        (
            ArtifactClass::PearlJewellery,
            detail(
                "Personal adornments such as necklaces, earrings, and pendants incorporating pearls. These were luxury items, often combined with other precious materials.",
                "Ancient Roman, Indian, and Persian empires through to the medieval period. Pearls have been prized as gems for millennia.",
                "Natural pearls harvested from oysters, often drilled and strung with gold, silver, or other beads.",
                "Represents wealth, high social status, and extensive trade networks. The discovery of pearl jewelry points to connections with marine environments where pearl-bearing mollusks were found.",
                Some("Pearls from the Gulf of Mannar fisheries moved along the same routes as textiles and spices, appearing in Roman trade accounts."),
                Some("Fine biconical drill holes and string wear at the perforations indicate stringing; settings preserve traces of gold or silver wire."),
            ),
        ),
        (
            ArtifactClass::Alloy,
            detail(
                "An object made from a mixture of metals, created to enhance properties like strength, hardness, or color. Bronze (copper and tin) and brass (copper and zinc) are common archaeological alloys.",
                "The Bronze Age (c. 3300 BCE) onwards. The development of alloys marks a pivotal moment in human technological history.",
                "Bronze, brass, electrum (gold and silver), and various other combinations depending on the culture and available resources.",
                "The ability to create alloys demonstrates advanced metallurgical knowledge. Alloy artifacts, such as tools, weapons, and statues, are hallmarks of complex societies.",
                None,
                Some("Casting seams, sprue scars, and compositional analysis (tin or zinc ratios) identify the alloying tradition and workshop."),
            ),
        ),
        (
            ArtifactClass::Blackstone,
            detail(
                "Artifacts carved from dark, fine-grained rock like basalt, schist, or steatite. This includes sculptures of deities, architectural elements, and ceremonial tools.",
                "Common in various periods, particularly noted in the sculptures of the Pala and Sena dynasties of Eastern India.",
                "Basalt, schist, or other dense, dark stones that allow for fine carving and a polished finish.",
                "Often used for creating durable and detailed religious icons and inscriptions. The geological source of the stone can help trace ancient trade and quarrying activities.",
                Some("Dark stone was favoured for temple imagery because it takes a high polish and withstands ritual bathing and anointing."),
                None,
            ),
        ),
        (
            ArtifactClass::VattaSillu,
            detail(
                "A type of circular grinding stone, often with a flat or slightly concave surface, used in conjunction with a smaller rolling stone (a muller) for processing food and other materials.",
                "Common in domestic contexts from the Neolithic period through historical times in South Asia.",
                "Hard, coarse-grained stone like granite or sandstone that provides an effective abrasive surface.",
                "A fundamental tool for food preparation, indicating a reliance on processed grains, spices, or medicinal herbs. It is a key indicator of sedentary, agricultural lifestyles.",
                Some("Grinding stones were fixtures of the household kitchen, frequently handed down and re-dressed across generations."),
                Some("Pecked and re-roughened working faces with directional polish show the grinding motion and intensity of use."),
            ),
        ),
        (
            ArtifactClass::Pottery,
            detail(
                "Ceramic ware made from fired clay. This is one of the most common types of artifacts found, encompassing everything from simple storage jars and cooking pots to elaborately decorated ceremonial vessels.",
                "From the Neolithic period (c. 10,000 BCE) onwards. It is a defining characteristic of this period.",
                "Fired clay, which may be mixed with tempering agents like sand, shell, or crushed rock to prevent cracking.",
                "Pottery is invaluable for archaeologists. Its style, shape, and decoration are primary tools for dating sites and identifying different cultural groups. Chemical analysis can even reveal what the pots were used to store.",
                Some("Vessel forms track cooking, storage, and serving practices; black-and-red ware in South India is strongly associated with megalithic burials."),
                Some("Wheel marks, firing cores, slips, and graffiti on sherds identify workshop technique and post-firing use."),
            ),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_class_has_a_detail() {
        let base = KnowledgeBase::builtin();
        for class in ArtifactClass::all() {
            assert!(
                !base.detail(class).is_placeholder(),
                "{class} has no curated detail"
            );
        }
    }

    #[test]
    fn test_unknown_label_returns_placeholder() {
        let base = KnowledgeBase::builtin();
        assert!(base.detail_for_label("sarcophagus").is_placeholder());
        assert!(base.detail_for_label("").is_placeholder());
    }

    #[test]
    fn test_known_label_returns_detail() {
        let base = KnowledgeBase::builtin();
        let detail = base.detail_for_label("pottery");
        assert!(detail.description.starts_with("Ceramic ware"));
    }

    #[test]
    fn test_reference_tables_populated() {
        let base = KnowledgeBase::builtin();
        assert!(!base.eras().is_empty());
        assert!(!base.sites().is_empty());
    }
}
