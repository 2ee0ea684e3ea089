//! The compiled-in checklist of recurring housing expenses.
//!
//! Only the checked state of each item is persisted; which sections and items
//! exist is decided here. Editing this list requires a redeploy but never a
//! schema migration.

use serde::Serialize;

/// One checkable line of the checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ItemTemplate {
    pub id: &'static str,
    pub label: &'static str,
}

/// A titled group of checklist items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SectionTemplate {
    pub id: &'static str,
    pub title: &'static str,
    pub items: &'static [ItemTemplate],
}

const fn item(id: &'static str, label: &'static str) -> ItemTemplate {
    ItemTemplate { id, label }
}

/// The expense checklist, in display order.
pub static CHECKLIST_TEMPLATE: &[SectionTemplate] = &[
    SectionTemplate {
        id: "abonnements",
        title: "Abonnements",
        items: &[
            item("eau", "Eau"),
            item("energie", "Énergie"),
            item("internet", "Internet"),
            item("telephone", "Téléphone"),
        ],
    },
    SectionTemplate {
        id: "charges_copropriete",
        title: "Charges de copropriété",
        items: &[item("appel_fonds", "Appel de fonds")],
    },
    SectionTemplate {
        id: "assurances",
        title: "Assurances",
        items: &[
            item("assurance_emprunteur", "Assurance emprunteur"),
            item(
                "assurance_habitation_pno",
                "Assurance Habitation 'Propriétaire Non Occupant'",
            ),
            item("autres_assurances", "Autres assurances"),
        ],
    },
    SectionTemplate {
        id: "equipements_entretien",
        title: "Équipements et entretien",
        items: &[
            item("autres_equipements", "Autres Équipements"),
            item("cuisine_equipee", "Cuisine équipée"),
            item("electromenager", "Électroménager"),
            item("entretien_reparations", "Entretien et réparations"),
            item("mobilier", "Mobilier"),
            item("travaux", "Travaux"),
        ],
    },
    SectionTemplate {
        id: "autres_frais",
        title: "Autres frais",
        items: &[
            item("adhesion_oga", "Adhésion à un OGA"),
            item("amendes_circulation", "Amendes de circulation"),
            item("autres_charges", "Autres charges"),
            item("autres_honoraires", "Autres honoraires"),
            item(
                "depot_garantie_locataire",
                "Dépôt de garantie rendu au locataire",
            ),
            item("documentation", "Documentation"),
            item(
                "frais_comptabilite",
                "Frais de comptabilité (facture JD2M, ELM,…)",
            ),
            item("frais_diagnostics", "Frais de diagnostics"),
            item("frais_tenue_compte", "Frais de tenue de compte"),
            item("frais_postaux", "Frais postaux"),
            item(
                "honoraires_agence_conciergerie",
                "Honoraires agence / Conciergerie",
            ),
            item("publicite", "Publicité"),
            item("seminaires_formations", "Séminaires et formations"),
        ],
    },
    SectionTemplate {
        id: "frais_acquisition",
        title: "Frais d'acquisition",
        items: &[
            item("commission_garantie_caution", "Commission garantie / caution"),
            item("decompte_notaire", "Décompte du notaire"),
            item("fond_mutuel_garantie", "Fond mutuel de garantie"),
        ],
    },
    SectionTemplate {
        id: "frais_deplacement_reception",
        title: "Frais de déplacement et réception",
        items: &[
            item("assurance_vehicule", "Assurance véhicule"),
            item("carburant", "Carburant"),
            item("entretien_vehicule", "Entretien véhicule"),
            item("hebergement", "Hébergement"),
            item("location_vehicule", "Location véhicule"),
            item("peage_parking", "Péage / parking"),
            item("restaurant", "Restaurant"),
            item("train_avion", "Train ou avion"),
        ],
    },
    SectionTemplate {
        id: "salaire",
        title: "Salaire",
        items: &[item("salaires", "Salaires")],
    },
    SectionTemplate {
        id: "impots_taxes",
        title: "Impôts et taxes",
        items: &[
            item("autres_impots_taxes", "Autres impôts et taxes"),
            item("csg", "CSG"),
            item("cfe", "CFE"),
            item("droits_donation", "Droits de donation"),
            item("droits_succession", "Droits de succession"),
            item("impot_revenu_ir", "Impôt sur le revenu (IR)"),
            item("pfac", "PFAC"),
            item("plus_value_immobiliere", "Plus-value immobilière"),
            item("redevance_tv", "Redevance TV"),
            item("taxe_amenagement", "Taxe d'aménagement"),
            item("taxe_assainissement", "Taxe d'assainissement"),
            item("taxe_habitation", "Taxe d'habitation"),
            item("taxe_sejour", "Taxe de séjour"),
            item("taxe_fonciere", "Taxe foncière"),
            item("taxe_petites_surfaces", "Taxe petites surfaces (234 CGI)"),
            item("tlv", "TLV"),
        ],
    },
    SectionTemplate {
        id: "sous_location",
        title: "Sous-location",
        items: &[item("sous_location_item", "Sous-location")],
    },
];

/// Total number of checkable items across all sections of `template`.
pub fn item_count(template: &[SectionTemplate]) -> usize {
    template.iter().map(|s| s.items.len()).sum()
}
