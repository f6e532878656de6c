//! Campagne de propriétés : les contrats observables de la session.
//!
//! But : vérifier bout à bout, à travers la façade, ce que voit le
//! collaborateur UI — affichage, résultat, mémoire de réponse.
//! - tailles bornées (suites de frappes courtes)
//! - budget temps global sur les boucles
//! - l'évaluation rend toujours une issue définie (nombre ou "ERROR")

use std::time::{Duration, Instant};

use super::format::AFFICHAGE_VIDE;
use super::jetons::Operateur;
use super::saisie::{Calculatrice, Parenthese, Touche, ERREUR};

/// Budget global anti-gel.
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/// Simule une suite de frappes ('^' = **, '±' = signe, '<' = annulation,
/// '@' = rappel de réponse).
fn tape(c: &mut Calculatrice, seq: &str) {
    for ch in seq.chars() {
        let touche = match ch {
            '0'..='9' => Touche::Chiffre(ch as u8 - b'0'),
            '+' => Touche::Operateur(Operateur::Plus),
            '-' => Touche::Operateur(Operateur::Moins),
            '*' => Touche::Operateur(Operateur::Fois),
            '/' => Touche::Operateur(Operateur::Division),
            '^' => Touche::Operateur(Operateur::Puissance),
            '(' => Touche::Parenthese(Parenthese::Ouvrante),
            ')' => Touche::Parenthese(Parenthese::Fermante),
            '.' => Touche::Point,
            '±' => Touche::Signe,
            '<' => Touche::Retour,
            '@' => Touche::Reponse,
            autre => panic!("frappe inconnue: {autre:?}"),
        };
        c.applique(touche);
    }
}

fn resultat(c: &mut Calculatrice, seq: &str) -> String {
    tape(c, seq);
    c.egal().unwrap_or_else(|| panic!("flux vide au moment de = (seq={seq:?})"))
}

/* ------------------------ Résultats et priorités ------------------------ */

#[test]
fn priorites_avant_ordre_de_frappe() {
    let mut c = Calculatrice::default();
    assert_eq!(resultat(&mut c, "2+3*4"), "14");
    assert_eq!(resultat(&mut c, "(2+3)*4"), "20");
}

#[test]
fn suite_de_chiffres_forme_l_entier() {
    let mut c = Calculatrice::default();
    tape(&mut c, "90210");
    assert_eq!(c.affichage(), "90210");
    assert_eq!(c.egal(), Some("90210".to_string()));
}

#[test]
fn deux_operateurs_seul_le_second_reste() {
    let mut c = Calculatrice::default();
    tape(&mut c, "6+*7");
    assert_eq!(c.affichage(), "6 × 7");
    assert_eq!(c.egal(), Some("42".to_string()));
}

#[test]
fn erreurs_definies() {
    let mut c = Calculatrice::default();
    assert_eq!(resultat(&mut c, "5/0"), ERREUR);
    assert_eq!(resultat(&mut c, "(2+3"), ERREUR);
}

#[test]
fn le_flux_est_vide_apres_egal_meme_en_erreur() {
    let mut c = Calculatrice::default();
    let _ = resultat(&mut c, "5/0");
    assert!(c.est_vide());

    let _ = resultat(&mut c, "2+2");
    assert!(c.est_vide());
}

/* ------------------------ Mémoire de réponse ------------------------ */

#[test]
fn calcul_chaine_via_rappel() {
    let mut c = Calculatrice::default();
    assert_eq!(resultat(&mut c, "2*2"), "4");

    tape(&mut c, "@+1");
    assert_eq!(c.affichage(), "4 + 1");
    assert_eq!(c.egal(), Some("5".to_string()));
}

#[test]
fn rappel_apres_erreur_inerte() {
    let mut c = Calculatrice::default();
    assert_eq!(resultat(&mut c, "5/0"), ERREUR);

    tape(&mut c, "@");
    assert!(c.est_vide());
    assert_eq!(c.affichage(), AFFICHAGE_VIDE);
}

#[test]
fn rappel_sans_calcul_prealable_inerte() {
    let mut c = Calculatrice::default();
    tape(&mut c, "@");
    assert!(c.est_vide());
}

#[test]
fn memoire_survit_a_la_remise_a_zero() {
    let mut c = Calculatrice::default();
    assert_eq!(resultat(&mut c, "6*7"), "42");

    tape(&mut c, "123");
    c.vide();
    assert!(c.est_vide());

    tape(&mut c, "@");
    assert_eq!(c.affichage(), "42");
}

#[test]
fn rappel_d_un_resultat_decimal() {
    let mut c = Calculatrice::default();
    assert_eq!(resultat(&mut c, "1/4"), "0.25");

    tape(&mut c, "@*4");
    assert_eq!(c.egal(), Some("1".to_string()));
}

/* ------------------------ Touches neutres ------------------------ */

#[test]
fn egal_sur_flux_vide_sans_effet() {
    let mut c = Calculatrice::default();
    assert_eq!(c.egal(), None);
}

#[test]
fn operateur_sur_flux_vide_ignore() {
    let mut c = Calculatrice::default();
    tape(&mut c, "+*/");
    assert!(c.est_vide());
    assert_eq!(c.affichage(), AFFICHAGE_VIDE);
}

/* ------------------------ Signe : aller-retour exact ------------------------ */

#[test]
fn signe_aller_retour_restaure_la_forme() {
    let t0 = Instant::now();
    let max = Duration::from_millis(200);

    for seq in ["5", "12", "0", "3.25", "0.", "12."] {
        budget(t0, max);

        let mut temoin = Calculatrice::default();
        tape(&mut temoin, seq);

        let mut c = Calculatrice::default();
        tape(&mut c, seq);
        tape(&mut c, "±±");

        assert_eq!(c.affichage(), temoin.affichage(), "seq={seq:?}");
    }
}

/* ------------------------ Annulation : drainage ------------------------ */

#[test]
fn annulation_draine_tout_flux() {
    let t0 = Instant::now();
    let max = Duration::from_millis(300);

    for seq in ["2+3*4", "(2+3)*(4-1)", "12.05", "0.±", "((", "9^2±"] {
        budget(t0, max);

        let mut c = Calculatrice::default();
        tape(&mut c, seq);

        let mut pas = 0usize;
        while !c.est_vide() {
            c.applique(Touche::Retour);
            pas += 1;
            assert!(pas <= 64, "annulation sans fin: seq={seq:?}");
        }
        assert_eq!(c.affichage(), AFFICHAGE_VIDE, "seq={seq:?}");
    }
}

/* ------------------------ Affichage ------------------------ */

#[test]
fn affichage_initial_et_glyphes() {
    let mut c = Calculatrice::default();
    assert_eq!(c.affichage(), AFFICHAGE_VIDE);

    tape(&mut c, "2*3");
    assert_eq!(c.affichage(), "2 × 3");
}

#[test]
fn l_expression_reste_affichee_apres_egal() {
    let mut c = Calculatrice::default();
    tape(&mut c, "2+2");
    let avant = c.affichage();

    assert_eq!(c.egal(), Some("4".to_string()));
    // le flux est vidé ; c'est au collaborateur de garder l'ancienne
    // chaîne à l'écran, le noyau ne lui rend plus que le vide
    assert!(c.est_vide());
    assert_ne!(avant, AFFICHAGE_VIDE);
}

/* ------------------------ Repli de l'opérateur final ------------------------ */

#[test]
fn operateur_final_conserve() {
    let mut c = Calculatrice::default();
    assert_eq!(resultat(&mut c, "5-"), "0");
    assert_eq!(resultat(&mut c, "2^"), "4");
}
