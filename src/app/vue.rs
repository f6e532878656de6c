// src/app/vue.rs
//
// Vue (UI egui) — natif + web
// ---------------------------
// Objectifs :
// - Un bouton = une action logique (Touche) ou une action de session
// - Gros boutons, grille fixe : utilisable au doigt
// - Affichage et résultat : deux champs monospace en lecture seule
//
// Toute la logique (flux, priorités, mémoire) vit dans le noyau ; ici on
// ne fait que classer les clics et recopier les deux chaînes de sortie.

use eframe::egui;

use crate::noyau::jetons::Operateur;
use crate::noyau::{Parenthese, Touche};

use super::etat::AppCalc;

impl AppCalc {
    /// UI principale : à appeler depuis eframe::App::update(...)
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);

        ui.heading("Calculatrice tactile");
        ui.add_space(6.0);

        self.ui_ecran(ui);

        ui.add_space(8.0);
        ui.separator();
        ui.add_space(8.0);

        self.ui_pave(ui);
    }

    fn ui_ecran(&mut self, ui: &mut egui::Ui) {
        ui.label("Calcul :");
        Self::champ_monospace(ui, "ecran_calcul", &self.affichage);

        ui.add_space(6.0);

        ui.label("Résultat :");
        Self::champ_monospace(ui, "ecran_resultat", &self.resultat);
    }

    fn ui_pave(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("pave_tactile")
            .num_columns(4)
            .spacing([6.0, 6.0])
            .show(ui, |ui| {
                self.bouton_session(ui, "AC", "Remise à zéro totale", Session::ResetTotal);
                self.bouton_touche(ui, "(", Touche::Parenthese(Parenthese::Ouvrante));
                self.bouton_touche(ui, ")", Touche::Parenthese(Parenthese::Fermante));
                self.bouton_touche(ui, "⌫", Touche::Retour);
                ui.end_row();

                self.bouton_touche(ui, "7", Touche::Chiffre(7));
                self.bouton_touche(ui, "8", Touche::Chiffre(8));
                self.bouton_touche(ui, "9", Touche::Chiffre(9));
                self.bouton_touche(ui, "÷", Touche::Operateur(Operateur::Division));
                ui.end_row();

                self.bouton_touche(ui, "4", Touche::Chiffre(4));
                self.bouton_touche(ui, "5", Touche::Chiffre(5));
                self.bouton_touche(ui, "6", Touche::Chiffre(6));
                self.bouton_touche(ui, "×", Touche::Operateur(Operateur::Fois));
                ui.end_row();

                self.bouton_touche(ui, "1", Touche::Chiffre(1));
                self.bouton_touche(ui, "2", Touche::Chiffre(2));
                self.bouton_touche(ui, "3", Touche::Chiffre(3));
                self.bouton_touche(ui, "-", Touche::Operateur(Operateur::Moins));
                ui.end_row();

                self.bouton_touche(ui, "0", Touche::Chiffre(0));
                self.bouton_touche(ui, ".", Touche::Point);
                self.bouton_touche(ui, "±", Touche::Signe);
                self.bouton_touche(ui, "+", Touche::Operateur(Operateur::Plus));
                ui.end_row();

                self.bouton_touche(ui, "ANS", Touche::Reponse);
                self.bouton_touche(ui, "xʸ", Touche::Operateur(Operateur::Puissance));
                self.bouton_session(ui, "=", "Évalue le calcul en cours", Session::Egal);
                ui.label("");
                ui.end_row();
            });
    }

    fn champ_monospace(ui: &mut egui::Ui, id: &str, contenu: &str) {
        // Lecture seule "stable", sans TextEdit interactif.
        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                ui.push_id(id, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.set_min_height(ui.text_style_height(&egui::TextStyle::Monospace));
                    ui.monospace(contenu);
                });
            });
    }

    fn bouton_touche(&mut self, ui: &mut egui::Ui, label: &str, touche: Touche) {
        let resp = ui.add_sized([56.0, 32.0], egui::Button::new(label));
        if resp.clicked() {
            self.appuie(touche);
        }
    }

    fn bouton_session(&mut self, ui: &mut egui::Ui, label: &str, tip: &str, action: Session) {
        let resp = ui
            .add_sized([56.0, 32.0], egui::Button::new(label))
            .on_hover_text(tip);

        if resp.clicked() {
            match action {
                Session::Egal => self.appuie_egal(),
                Session::ResetTotal => self.reset_total(),
            }
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Session {
    Egal,
    ResetTotal,
}
