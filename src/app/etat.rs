//! src/app/etat.rs
//!
//! État UI + enchaînement des actions (sans vue).
//!
//! Rôle : porter la session de calcul (flux + mémoire, via Calculatrice)
//! et les deux sorties que la vue se contente de lire (affichage, résultat).
//!
//! Contrats :
//! - chaque touche mutante re-formate l'affichage aussitôt
//! - "=" n'écrit que la ligne de résultat ; l'expression tapée reste à
//!   l'écran alors que le flux est déjà vidé pour la frappe suivante
//! - AC vide flux + lignes ; la mémoire de réponse survit

use crate::noyau::format::AFFICHAGE_VIDE;
use crate::noyau::{Calculatrice, Touche};

#[derive(Clone, Debug)]
pub struct AppCalc {
    pub calculatrice: Calculatrice,

    // --- sorties lues par la vue ---
    pub affichage: String,
    pub resultat: String,
}

impl Default for AppCalc {
    fn default() -> Self {
        Self {
            calculatrice: Calculatrice::default(),
            affichage: AFFICHAGE_VIDE.to_string(),
            resultat: AFFICHAGE_VIDE.to_string(),
        }
    }
}

impl AppCalc {
    /// Touche mutante : appliquée au noyau, puis affichage re-formaté.
    pub fn appuie(&mut self, touche: Touche) {
        self.calculatrice.applique(touche);
        self.affichage = self.calculatrice.affichage();
    }

    /// Touche "=" : ligne de résultat seulement (rien sur flux vide).
    pub fn appuie_egal(&mut self) {
        if let Some(resultat) = self.calculatrice.egal() {
            self.resultat = resultat;
        }
    }

    /// AC : flux + les deux lignes (la mémoire de réponse est conservée).
    pub fn reset_total(&mut self) {
        self.calculatrice.vide();
        self.affichage = AFFICHAGE_VIDE.to_string();
        self.resultat = AFFICHAGE_VIDE.to_string();
    }
}
