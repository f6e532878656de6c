// src/noyau/format.rs
//
// Chaîne d'affichage du flux, de gauche à droite :
// - '*' devient ×, '/' devient ÷, les autres opérateurs gardent leur
//   symbole, tous entourés d'une espace simple
// - '**' ne s'affiche pas lui-même : l'opérande qui le suit passe en
//   exposant (chiffres Unicode)
// - nombres, littéraux en cours et parenthèses s'affichent tels quels
// - un flux vide s'affiche comme espace insécable (la ligne reste visible)

use super::jetons::{Jeton, Operateur};
use super::saisie::Flux;

/// Espace insécable : l'affichage d'un flux vide n'est jamais la chaîne vide.
pub const AFFICHAGE_VIDE: &str = "\u{a0}";

pub fn affiche(flux: &Flux) -> String {
    if flux.est_vide() {
        return AFFICHAGE_VIDE.to_string();
    }

    let mut sortie = String::new();
    let mut exposant = false;

    for jeton in flux.jetons() {
        match jeton {
            Jeton::Operateur(Operateur::Fois) => sortie.push_str(" × "),
            Jeton::Operateur(Operateur::Division) => sortie.push_str(" ÷ "),
            Jeton::Operateur(Operateur::Puissance) => exposant = true,
            Jeton::Operateur(op) => {
                sortie.push(' ');
                sortie.push_str(op.symbole());
                sortie.push(' ');
            }

            Jeton::Nombre(_) | Jeton::Texte(_) => {
                let texte = jeton.texte();
                if exposant {
                    sortie.push_str(&en_exposant(&texte));
                    exposant = false;
                } else {
                    sortie.push_str(&texte);
                }
            }

            autre => sortie.push_str(&autre.texte()),
        }
    }

    sortie
}

/// Chiffres et signe en exposant Unicode ; le reste passe tel quel.
fn en_exposant(texte: &str) -> String {
    texte
        .chars()
        .map(|c| match c {
            '0' => '⁰',
            '1' => '¹',
            '2' => '²',
            '3' => '³',
            '4' => '⁴',
            '5' => '⁵',
            '6' => '⁶',
            '7' => '⁷',
            '8' => '⁸',
            '9' => '⁹',
            '-' => '⁻',
            autre => autre,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::super::jetons::Operateur;
    use super::super::saisie::{Flux, Parenthese};
    use super::{affiche, AFFICHAGE_VIDE};

    fn tape(seq: &str) -> Flux {
        let mut flux = Flux::default();
        for c in seq.chars() {
            match c {
                '0'..='9' => flux.ajoute_chiffre(c as u8 - b'0'),
                '+' => flux.ajoute_operateur(Operateur::Plus),
                '-' => flux.ajoute_operateur(Operateur::Moins),
                '*' => flux.ajoute_operateur(Operateur::Fois),
                '/' => flux.ajoute_operateur(Operateur::Division),
                '^' => flux.ajoute_operateur(Operateur::Puissance),
                '(' => flux.ajoute_parenthese(Parenthese::Ouvrante),
                ')' => flux.ajoute_parenthese(Parenthese::Fermante),
                '.' => flux.ajoute_point(),
                '±' => flux.bascule_signe(),
                autre => panic!("frappe inconnue: {autre:?}"),
            }
        }
        flux
    }

    #[test]
    fn flux_vide_espace_insecable() {
        assert_eq!(affiche(&Flux::default()), AFFICHAGE_VIDE);
    }

    #[test]
    fn glyphes_des_operateurs() {
        assert_eq!(affiche(&tape("2*3")), "2 × 3");
        assert_eq!(affiche(&tape("8/2")), "8 ÷ 2");
        assert_eq!(affiche(&tape("1+2-3")), "1 + 2 - 3");
    }

    #[test]
    fn exposant_en_chiffres_unicode() {
        assert_eq!(affiche(&tape("2^10")), "2¹⁰");
        assert_eq!(affiche(&tape("2^3+1")), "2³ + 1");
        assert_eq!(affiche(&tape("2^3±")), "2⁻³");
    }

    #[test]
    fn litteraux_en_cours_tels_quels() {
        assert_eq!(affiche(&tape("2.")), "2.");
        assert_eq!(affiche(&tape("1.0")), "1.0");
        assert_eq!(affiche(&tape("0±")), "-0");
    }

    #[test]
    fn parentheses_et_implicite() {
        assert_eq!(affiche(&tape("(2+3)*4")), "(2 + 3) × 4");
        assert_eq!(affiche(&tape("2(3)")), "2 × (3)");
    }
}
